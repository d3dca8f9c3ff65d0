use crate::domain::model::{BookingRequest, BusinessHours, Service, TimeSlot};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

/// Persistent key-value store, the counterpart of the browser's local storage.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn write(&self, key: &str, value: &str)
        -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn location(&self) -> &str;
    fn business_hours(&self) -> BusinessHours;
    fn request_timeout(&self) -> Duration;
    fn storage_path(&self) -> &str;
}

/// Backend behind the booking modal.
#[async_trait]
pub trait BookingTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_slots(&self, date: NaiveDate, service: &Service) -> Result<Vec<TimeSlot>>;

    /// Returns the backend's success message, if any.
    async fn submit_booking(&self, request: &BookingRequest) -> Result<Option<String>>;
}

#[async_trait]
impl<T: BookingTransport + ?Sized> BookingTransport for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch_slots(&self, date: NaiveDate, service: &Service) -> Result<Vec<TimeSlot>> {
        (**self).fetch_slots(date, service).await
    }

    async fn submit_booking(&self, request: &BookingRequest) -> Result<Option<String>> {
        (**self).submit_booking(request).await
    }
}
