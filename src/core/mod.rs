pub mod booking;
pub mod catalog;
pub mod filter;
pub mod i18n;
pub mod page;
pub mod reviews;
pub mod slots;

pub use crate::domain::model::{Review, Service, TimeSlot};
pub use crate::domain::ports::{BookingTransport, ConfigProvider, Storage};
pub use crate::utils::error::Result;
