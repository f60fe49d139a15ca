use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::booking::DATE_FORMAT;
use crate::models::hours::TIME_FORMAT;
use crate::models::{
    Booking, BookingStatus, Business, NewBusiness, OperatingHours, Service, ServiceFields,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Businesses ──

const BUSINESS_COLUMNS: &str = "id, name, slug, owner_phone, password, open_time, close_time";

pub fn create_business(conn: &Connection, business: &NewBusiness) -> anyhow::Result<i64> {
    let (open_time, close_time) = hours_columns(business.hours.as_ref());
    conn.execute(
        "INSERT INTO businesses (name, slug, owner_phone, password, open_time, close_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            business.name.trim(),
            business.slug,
            business.owner_phone.trim(),
            business.password,
            open_time,
            close_time,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_business(conn: &Connection, id: i64) -> anyhow::Result<Option<Business>> {
    let sql = format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE id = ?1");
    conn.query_row(&sql, params![id], |row| Ok(parse_business_row(row)))
        .optional()?
        .transpose()
}

pub fn get_business_by_slug(conn: &Connection, slug: &str) -> anyhow::Result<Option<Business>> {
    let sql = format!("SELECT {BUSINESS_COLUMNS} FROM businesses WHERE slug = ?1");
    conn.query_row(&sql, params![slug], |row| Ok(parse_business_row(row)))
        .optional()?
        .transpose()
}

pub fn get_business_by_owner_phone(
    conn: &Connection,
    phone: &str,
) -> anyhow::Result<Option<Business>> {
    let sql = format!(
        "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE owner_phone = ?1 ORDER BY id ASC LIMIT 1"
    );
    conn.query_row(&sql, params![phone], |row| Ok(parse_business_row(row)))
        .optional()?
        .transpose()
}

pub fn list_businesses(conn: &Connection) -> anyhow::Result<Vec<Business>> {
    let sql = format!("SELECT {BUSINESS_COLUMNS} FROM businesses ORDER BY id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok(parse_business_row(row)))?;

    let mut businesses = vec![];
    for row in rows {
        businesses.push(row??);
    }
    Ok(businesses)
}

pub fn update_business(conn: &Connection, id: i64, business: &NewBusiness) -> anyhow::Result<bool> {
    let (open_time, close_time) = hours_columns(business.hours.as_ref());
    let count = conn.execute(
        "UPDATE businesses
         SET name = ?1, slug = ?2, owner_phone = ?3, password = ?4, open_time = ?5, close_time = ?6
         WHERE id = ?7",
        params![
            business.name.trim(),
            business.slug,
            business.owner_phone.trim(),
            business.password,
            open_time,
            close_time,
            id,
        ],
    )?;
    Ok(count > 0)
}

pub fn set_business_hours(
    conn: &Connection,
    id: i64,
    hours: Option<&OperatingHours>,
) -> anyhow::Result<bool> {
    let (open_time, close_time) = hours_columns(hours);
    let count = conn.execute(
        "UPDATE businesses SET open_time = ?1, close_time = ?2 WHERE id = ?3",
        params![open_time, close_time, id],
    )?;
    Ok(count > 0)
}

/// Removes the business together with its services and bookings.
pub fn delete_business(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM businesses WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn hours_columns(hours: Option<&OperatingHours>) -> (Option<String>, Option<String>) {
    match hours {
        Some(h) => (
            Some(h.open.format(TIME_FORMAT).to_string()),
            Some(h.close.format(TIME_FORMAT).to_string()),
        ),
        None => (None, None),
    }
}

fn parse_business_row(row: &rusqlite::Row) -> anyhow::Result<Business> {
    let open_time: Option<String> = row.get(5)?;
    let close_time: Option<String> = row.get(6)?;

    let hours = match (open_time, close_time) {
        (Some(open), Some(close)) => Some(
            OperatingHours::parse(&open, &close).context("stored operating hours are invalid")?,
        ),
        _ => None,
    };

    Ok(Business {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        owner_phone: row.get(3)?,
        password: row.get(4)?,
        hours,
    })
}

// ── Services ──

pub fn create_service(
    conn: &Connection,
    business_id: i64,
    service: &ServiceFields,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO services (business_id, name, duration_minutes, price) VALUES (?1, ?2, ?3, ?4)",
        params![business_id, service.name.trim(), service.duration_minutes, service.price],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_service(conn: &Connection, id: i64) -> anyhow::Result<Option<Service>> {
    let service = conn
        .query_row(
            "SELECT id, business_id, name, duration_minutes, price FROM services WHERE id = ?1",
            params![id],
            parse_service_row,
        )
        .optional()?;
    Ok(service)
}

pub fn list_services(conn: &Connection, business_id: i64) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(
        "SELECT id, business_id, name, duration_minutes, price
         FROM services WHERE business_id = ?1 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![business_id], parse_service_row)?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

pub fn update_service(conn: &Connection, id: i64, service: &ServiceFields) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE services SET name = ?1, duration_minutes = ?2, price = ?3 WHERE id = ?4",
        params![service.name.trim(), service.duration_minutes, service.price, id],
    )?;
    Ok(count > 0)
}

pub fn delete_service(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_service_row(row: &rusqlite::Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        business_id: row.get(1)?,
        name: row.get(2)?,
        duration_minutes: row.get(3)?,
        price: row.get(4)?,
    })
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, business_id, service_id, service_name, duration_minutes, \
     customer_name, customer_phone, booking_date, booking_time, status, created_at";

/// Inserts the booking and returns its new id. `booking.id` is ignored.
pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO bookings (business_id, service_id, service_name, duration_minutes,
                               customer_name, customer_phone, booking_date, booking_time,
                               status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.business_id,
            booking.service_id,
            booking.service_name,
            booking.duration_minutes,
            booking.customer_name,
            booking.customer_phone,
            booking.booking_date.format(DATE_FORMAT).to_string(),
            booking.booking_time.format(TIME_FORMAT).to_string(),
            booking.status.as_str(),
            booking.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_booking(conn: &Connection, id: i64) -> anyhow::Result<Option<Booking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1");
    conn.query_row(&sql, params![id], |row| Ok(parse_booking_row(row)))
        .optional()?
        .transpose()
}

/// Confirmed bookings of one business on one calendar date, earliest first.
pub fn get_confirmed_bookings_on(
    conn: &Connection,
    business_id: i64,
    date: NaiveDate,
) -> anyhow::Result<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE business_id = ?1 AND booking_date = ?2 AND status = 'confirmed'
         ORDER BY booking_time ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![business_id, date.format(DATE_FORMAT).to_string()],
        |row| Ok(parse_booking_row(row)),
    )?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// All bookings of a business, newest appointment first.
pub fn get_bookings_for_business(
    conn: &Connection,
    business_id: i64,
) -> anyhow::Result<Vec<Booking>> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE business_id = ?1
         ORDER BY booking_date DESC, booking_time DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![business_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let date_str: String = row.get(7)?;
    let time_str: String = row.get(8)?;
    let status_str: String = row.get(9)?;
    let created_at_str: String = row.get(10)?;

    let booking_date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .with_context(|| format!("invalid stored booking date: {date_str}"))?;
    let booking_time = NaiveTime::parse_from_str(&time_str, TIME_FORMAT)
        .with_context(|| format!("invalid stored booking time: {time_str}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid stored timestamp: {created_at_str}"))?;
    let status = BookingStatus::parse(&status_str)
        .with_context(|| format!("invalid stored booking status: {status_str}"))?;

    Ok(Booking {
        id: row.get(0)?,
        business_id: row.get(1)?,
        service_id: row.get(2)?,
        service_name: row.get(3)?,
        duration_minutes: row.get(4)?,
        customer_name: row.get(5)?,
        customer_phone: row.get(6)?,
        booking_date,
        booking_time,
        status,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn new_business(slug: &str, hours: Option<OperatingHours>) -> NewBusiness {
        NewBusiness {
            name: "Fade Factory".to_string(),
            slug: slug.to_string(),
            owner_phone: "+15559999999".to_string(),
            password: "secret".to_string(),
            hours,
        }
    }

    fn haircut() -> ServiceFields {
        ServiceFields {
            name: "Haircut".to_string(),
            duration_minutes: 60,
            price: 25.0,
        }
    }

    fn booking(business_id: i64, service_id: i64, date: &str, time: &str) -> Booking {
        Booking {
            id: 0,
            business_id,
            service_id: Some(service_id),
            service_name: "Haircut".to_string(),
            duration_minutes: 60,
            customer_name: "Alice".to_string(),
            customer_phone: "+15551110000".to_string(),
            booking_date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            booking_time: NaiveTime::parse_from_str(time, TIME_FORMAT).unwrap(),
            status: BookingStatus::Confirmed,
            created_at: NaiveDateTime::parse_from_str("2030-01-01 08:00:00", TIMESTAMP_FORMAT)
                .unwrap(),
        }
    }

    #[test]
    fn test_business_round_trip_with_hours() {
        let conn = setup_db();
        let hours = OperatingHours::parse("09:00", "22:00").unwrap();
        let id = create_business(&conn, &new_business("fade", Some(hours))).unwrap();

        let b = get_business(&conn, id).unwrap().unwrap();
        assert_eq!(b.slug, "fade");
        assert_eq!(b.hours, Some(hours));

        let by_slug = get_business_by_slug(&conn, "fade").unwrap().unwrap();
        assert_eq!(by_slug.id, id);

        let by_phone = get_business_by_owner_phone(&conn, "+15559999999").unwrap().unwrap();
        assert_eq!(by_phone.id, id);

        assert!(get_business(&conn, id + 1).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let conn = setup_db();
        create_business(&conn, &new_business("fade", None)).unwrap();
        assert!(create_business(&conn, &new_business("fade", None)).is_err());
    }

    #[test]
    fn test_set_and_clear_hours() {
        let conn = setup_db();
        let id = create_business(&conn, &new_business("fade", None)).unwrap();
        assert!(get_business(&conn, id).unwrap().unwrap().hours.is_none());

        let hours = OperatingHours::parse("10:00", "18:00").unwrap();
        assert!(set_business_hours(&conn, id, Some(&hours)).unwrap());
        assert_eq!(get_business(&conn, id).unwrap().unwrap().hours, Some(hours));

        assert!(set_business_hours(&conn, id, None).unwrap());
        assert!(get_business(&conn, id).unwrap().unwrap().hours.is_none());
    }

    #[test]
    fn test_service_crud() {
        let conn = setup_db();
        let business_id = create_business(&conn, &new_business("fade", None)).unwrap();
        let service_id = create_service(&conn, business_id, &haircut()).unwrap();

        let updated = ServiceFields {
            name: "Long haircut".to_string(),
            duration_minutes: 90,
            price: 35.0,
        };
        assert!(update_service(&conn, service_id, &updated).unwrap());

        let services = list_services(&conn, business_id).unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "Long haircut");
        assert_eq!(services[0].duration_minutes, 90);

        assert!(delete_service(&conn, service_id).unwrap());
        assert!(get_service(&conn, service_id).unwrap().is_none());
        assert!(!delete_service(&conn, service_id).unwrap());
    }

    #[test]
    fn test_confirmed_bookings_scoped_by_business_date_and_status() {
        let conn = setup_db();
        let b1 = create_business(&conn, &new_business("one", None)).unwrap();
        let b2 = create_business(&conn, &new_business("two", None)).unwrap();
        let s1 = create_service(&conn, b1, &haircut()).unwrap();
        let s2 = create_service(&conn, b2, &haircut()).unwrap();

        create_booking(&conn, &booking(b1, s1, "2030-06-16", "10:00")).unwrap();
        let cancelled = create_booking(&conn, &booking(b1, s1, "2030-06-16", "12:00")).unwrap();
        update_booking_status(&conn, cancelled, BookingStatus::Cancelled).unwrap();
        create_booking(&conn, &booking(b1, s1, "2030-06-17", "10:00")).unwrap();
        create_booking(&conn, &booking(b2, s2, "2030-06-16", "10:00")).unwrap();

        let date = NaiveDate::from_ymd_opt(2030, 6, 16).unwrap();
        let found = get_confirmed_bookings_on(&conn, b1, date).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].booking_time.format(TIME_FORMAT).to_string(), "10:00");
    }

    #[test]
    fn test_bookings_for_business_newest_first() {
        let conn = setup_db();
        let b = create_business(&conn, &new_business("fade", None)).unwrap();
        let s = create_service(&conn, b, &haircut()).unwrap();
        create_booking(&conn, &booking(b, s, "2030-06-16", "10:00")).unwrap();
        create_booking(&conn, &booking(b, s, "2030-06-17", "09:00")).unwrap();
        create_booking(&conn, &booking(b, s, "2030-06-16", "15:00")).unwrap();

        let all = get_bookings_for_business(&conn, b).unwrap();
        let order: Vec<String> = all
            .iter()
            .map(|b| format!("{} {}", b.booking_date, b.booking_time.format(TIME_FORMAT)))
            .collect();
        assert_eq!(order, ["2030-06-17 09:00", "2030-06-16 15:00", "2030-06-16 10:00"]);
    }

    #[test]
    fn test_deleting_service_keeps_bookings() {
        let conn = setup_db();
        let b = create_business(&conn, &new_business("fade", None)).unwrap();
        let s = create_service(&conn, b, &haircut()).unwrap();
        let id = create_booking(&conn, &booking(b, s, "2030-06-16", "10:00")).unwrap();

        delete_service(&conn, s).unwrap();

        let kept = get_booking(&conn, id).unwrap().unwrap();
        assert_eq!(kept.service_id, None);
        assert_eq!(kept.service_name, "Haircut");
        assert_eq!(kept.duration_minutes, 60);
    }

    #[test]
    fn test_unknown_stored_status_is_an_error() {
        let conn = setup_db();
        let b = create_business(&conn, &new_business("fade", None)).unwrap();
        let s = create_service(&conn, b, &haircut()).unwrap();
        let id = create_booking(&conn, &booking(b, s, "2030-06-16", "10:00")).unwrap();
        conn.execute("UPDATE bookings SET status = 'pending' WHERE id = ?1", params![id])
            .unwrap();

        assert!(get_booking(&conn, id).is_err());
        assert!(get_bookings_for_business(&conn, b).is_err());
    }

    #[test]
    fn test_deleting_business_cascades() {
        let conn = setup_db();
        let b = create_business(&conn, &new_business("fade", None)).unwrap();
        let s = create_service(&conn, b, &haircut()).unwrap();
        let id = create_booking(&conn, &booking(b, s, "2030-06-16", "10:00")).unwrap();

        assert!(delete_business(&conn, b).unwrap());
        assert!(get_service(&conn, s).unwrap().is_none());
        assert!(get_booking(&conn, id).unwrap().is_none());
    }
}
