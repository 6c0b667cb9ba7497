mod calendar_month;
mod price;
mod service_name;

pub use calendar_month::CalendarMonth;
pub use price::Price;
pub use service_name::ServiceName;
