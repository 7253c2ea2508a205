use actix_web::{HttpResponse, web};
use chrono::{Datelike, NaiveDateTime, NaiveTime, Utc};
use serde_json::json;

use crate::config::STORAGE_ROOT;
use crate::database::DbPool;
use crate::error::ApiError;
use crate::lifecycle::FileStatus;
use crate::repositories::files;
use crate::requests::query::DashboardQuery;
use crate::storage::FilesStorage;

/// Start of the recent-uploads window for a dashboard filter; None counts
/// every upload.
fn period_start(filter: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let today = now.date();
    let start = match filter {
        "daily" => today,
        "monthly" => today.with_day(1).unwrap_or(today),
        "yearly" => today
            .with_day(1)
            .and_then(|d| d.with_month(1))
            .unwrap_or(today),
        _ => return None,
    };

    Some(start.and_time(NaiveTime::MIN))
}

/// Human-readable byte count, GB down to Bytes with two decimals.
fn format_size_units(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} Bytes", bytes)
    }
}

/// GET /admin/dashboard
/// Admin overview: status counts, recent-upload count for the requested
/// window, total storage used by the uploads tree and the latest activity.
pub async fn dashboard(
    pool: web::Data<DbPool>,
    storage: web::Data<FilesStorage>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = query
        .into_inner()
        .filter
        .unwrap_or_else(|| "all".to_string());

    let active_files = files::count_by_status(&pool, FileStatus::Active.as_str())?;
    let pending_files = files::count_by_status(&pool, FileStatus::Pending.as_str())?;

    let cutoff = period_start(&filter, Utc::now().naive_utc());
    let recent_uploads = files::count_created_since(&pool, cutoff)?;

    let storage_used_bytes = storage.dir_size(STORAGE_ROOT)?;
    let recent_files = files::recent_files(&pool, 10)?;

    Ok(HttpResponse::Ok().json(json!({
        "active_files": active_files,
        "pending_files": pending_files,
        "recent_uploads": recent_uploads,
        "storage_used": format_size_units(storage_used_bytes),
        "storage_used_bytes": storage_used_bytes,
        "recent_files": recent_files,
        "filter": filter,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    #[test]
    fn daily_window_starts_at_midnight() {
        let start = period_start("daily", at(2024, 5, 17, 15)).unwrap();
        assert_eq!(start, at(2024, 5, 17, 0).date().and_time(NaiveTime::MIN));
    }

    #[test]
    fn monthly_and_yearly_windows_start_on_the_first() {
        let now = at(2024, 5, 17, 15);

        let monthly = period_start("monthly", now).unwrap();
        assert_eq!(monthly.date(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        let yearly = period_start("yearly", now).unwrap();
        assert_eq!(yearly.date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn unknown_filters_count_everything() {
        assert_eq!(period_start("all", at(2024, 5, 17, 15)), None);
        assert_eq!(period_start("weekly", at(2024, 5, 17, 15)), None);
    }

    #[test]
    fn sizes_format_with_two_decimals() {
        assert_eq!(format_size_units(512), "512 Bytes");
        assert_eq!(format_size_units(1024), "1.00 KB");
        assert_eq!(format_size_units(1536), "1.50 KB");
        assert_eq!(format_size_units(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size_units(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
