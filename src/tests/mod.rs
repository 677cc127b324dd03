use chrono::{NaiveDate, NaiveDateTime};

use crate::form::DispatchContext;

mod app;
mod form;
mod presentation;

/// 2025-03-14 10:30, a Friday.
pub(crate) fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .and_then(|date| date.and_hms_opt(10, 30, 0))
        .expect("valid fixed clock")
}

pub(crate) fn test_ctx() -> DispatchContext {
    DispatchContext::default().with_now(fixed_now())
}
