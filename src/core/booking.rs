use crate::core::catalog::ServiceCatalog;
use crate::core::slots::{format_date_display, today};
use crate::domain::model::{
    BookingConfirmation, BookingForm, BookingRequest, BusinessHours, Locale, Service, TimeSlot,
};
use crate::domain::ports::BookingTransport;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{validate_email, validate_non_empty};
use chrono::{NaiveDate, SecondsFormat, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

pub const DEFAULT_LOCATION: &str = "Carrera 54 #55-53 local 1";
pub const SUBMIT_LABEL: &str = "Confirmar Reserva";
pub const SUBMITTING_LABEL: &str = "Creando reserva...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
    LoadingSlots,
    SlotsLoaded,
    SlotSelected,
    Submitting,
}

/// What the time picker shows after a date is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotListing {
    Available(Vec<TimeSlot>),
    Empty,
    NeedsAuthorization { auth_url: Option<String> },
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub disabled: bool,
    pub label: String,
}

impl Default for SubmitButton {
    fn default() -> Self {
        Self {
            disabled: false,
            label: SUBMIT_LABEL.to_string(),
        }
    }
}

#[derive(Debug)]
struct ModalInner {
    state: ModalState,
    service: Option<Service>,
    slots: Vec<TimeSlot>,
    form: BookingForm,
    button: SubmitButton,
    // Bumped whenever the selection changes, so a slow slot fetch cannot
    // overwrite a newer one.
    generation: u64,
}

/// Clears the in-flight flag however the submission ends.
struct SubmissionGuard<'a>(&'a AtomicBool);

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The booking modal: one flow, any `BookingTransport`.
pub struct BookingModal<T: BookingTransport> {
    transport: T,
    catalog: ServiceCatalog,
    hours: BusinessHours,
    location: String,
    locale: Locale,
    inner: Mutex<ModalInner>,
    submitting: AtomicBool,
}

impl<T: BookingTransport> BookingModal<T> {
    pub fn new(transport: T, catalog: ServiceCatalog, hours: BusinessHours) -> Self {
        Self {
            transport,
            catalog,
            hours,
            location: DEFAULT_LOCATION.to_string(),
            locale: Locale::Es,
            inner: Mutex::new(ModalInner {
                state: ModalState::Closed,
                service: None,
                slots: Vec::new(),
                form: BookingForm::default(),
                button: SubmitButton::default(),
                generation: 0,
            }),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn state(&self) -> ModalState {
        self.inner.lock().await.state
    }

    pub async fn selected_service(&self) -> Option<Service> {
        self.inner.lock().await.service.clone()
    }

    pub async fn slots(&self) -> Vec<TimeSlot> {
        self.inner.lock().await.slots.clone()
    }

    pub async fn form(&self) -> BookingForm {
        self.inner.lock().await.form.clone()
    }

    pub async fn submit_button(&self) -> SubmitButton {
        self.inner.lock().await.button.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Earliest date the date picker accepts.
    pub fn min_date(&self) -> NaiveDate {
        today(&self.hours)
    }

    pub async fn open(&self, service_id: &str) -> Result<Service> {
        let service = self.catalog.get(service_id)?.clone();
        tracing::info!("Opening booking for '{}' ({} min)", service.name, service.duration);

        let mut inner = self.inner.lock().await;
        inner.state = ModalState::Open;
        inner.service = Some(service.clone());
        inner.slots.clear();
        inner.form.reset();
        inner.button = SubmitButton::default();
        inner.generation += 1;
        Ok(service)
    }

    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        inner.state = ModalState::Closed;
        inner.service = None;
        inner.slots.clear();
        inner.generation += 1;
    }

    /// Load the candidate slots of `date`. Transport failures degrade to a
    /// listing the time picker can show; they are not returned as errors.
    pub async fn select_date(&self, date: NaiveDate) -> Result<SlotListing> {
        if self.is_submitting() {
            tracing::warn!("Booking in progress, keeping the loaded slots");
            return Err(SiteError::SubmissionInProgress);
        }
        if date < self.min_date() {
            return Err(SiteError::validation("date", format!("{} is in the past", date)));
        }

        let (service, generation) = {
            let mut inner = self.inner.lock().await;
            let service = inner.service.clone().ok_or(SiteError::NoServiceSelected)?;
            inner.state = ModalState::LoadingSlots;
            inner.form.date = date.format("%Y-%m-%d").to_string();
            inner.form.time.clear();
            inner.slots.clear();
            inner.generation += 1;
            (service, inner.generation)
        };

        tracing::debug!("Loading slots for {} via {}", date, self.transport.name());
        let fetched = self.transport.fetch_slots(date, &service).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            tracing::debug!("Discarding stale slot listing for {}", date);
            return Ok(SlotListing::Unavailable("selection changed".to_string()));
        }
        inner.state = ModalState::SlotsLoaded;

        let listing = match fetched {
            Ok(slots) if slots.is_empty() => SlotListing::Empty,
            Ok(slots) => {
                inner.slots = slots.clone();
                SlotListing::Available(slots)
            }
            Err(SiteError::AuthorizationRequired { auth_url }) => {
                tracing::warn!("Slot lookup needs backend authorization");
                SlotListing::NeedsAuthorization { auth_url }
            }
            Err(SiteError::NeedsReauth) => {
                tracing::warn!("Backend session expired while loading slots");
                SlotListing::NeedsAuthorization { auth_url: None }
            }
            Err(e) => {
                tracing::error!("Error loading available slots: {}", e);
                SlotListing::Unavailable(e.to_string())
            }
        };
        Ok(listing)
    }

    pub async fn select_time(&self, time: &str) -> Result<TimeSlot> {
        let mut inner = self.inner.lock().await;
        let slot = inner
            .slots
            .iter()
            .find(|slot| slot.time == time)
            .cloned()
            .ok_or_else(|| SiteError::SlotNotAvailable {
                time: time.to_string(),
            })?;
        inner.form.time = slot.time.clone();
        inner.state = ModalState::SlotSelected;
        Ok(slot)
    }

    /// Validate and send the booking. Every check runs before the transport
    /// is touched; a second call while one is in flight is rejected.
    pub async fn submit(&self, form: BookingForm) -> Result<BookingConfirmation> {
        if self.submitting.swap(true, Ordering::SeqCst) {
            tracing::warn!("Booking already in progress, ignoring submit");
            return Err(SiteError::SubmissionInProgress);
        }
        let _guard = SubmissionGuard(&self.submitting);

        let (request, confirmation) = {
            let mut inner = self.inner.lock().await;
            let form = BookingForm {
                name: form.name.trim().to_string(),
                email: form.email.trim().to_string(),
                phone: form.phone.trim().to_string(),
                date: form.date.trim().to_string(),
                time: form.time,
            };
            inner.form = form.clone();

            let (request, confirmation) = self.build_request(&inner, &form)?;

            inner.state = ModalState::Submitting;
            inner.button = SubmitButton {
                disabled: true,
                label: SUBMITTING_LABEL.to_string(),
            };
            (request, confirmation)
        };

        tracing::info!(
            "Submitting booking for '{}' on {} at {}",
            request.service_name,
            request.date,
            request.formatted_time
        );
        let outcome = self.transport.submit_booking(&request).await;

        let mut inner = self.inner.lock().await;
        inner.button = SubmitButton::default();
        match outcome {
            Ok(message) => {
                if let Some(message) = message {
                    tracing::debug!("Backend confirmation: {}", message);
                }
                tracing::info!("Booking confirmed for {} {}", confirmation.date, confirmation.time);
                inner.state = ModalState::Closed;
                inner.service = None;
                inner.slots.clear();
                inner.form.reset();
                inner.generation += 1;
                Ok(confirmation)
            }
            Err(e) => {
                tracing::error!("Error processing booking: {}", e);
                inner.state = ModalState::SlotSelected;
                Err(e)
            }
        }
    }

    fn build_request(
        &self,
        inner: &ModalInner,
        form: &BookingForm,
    ) -> Result<(BookingRequest, BookingConfirmation)> {
        validate_non_empty("name", &form.name)?;
        validate_non_empty("email", &form.email)?;
        validate_non_empty("phone", &form.phone)?;
        validate_non_empty("date", &form.date)?;
        validate_non_empty("time", &form.time)?;
        validate_email("email", &form.email)?;

        let date = form
            .parsed_date()
            .ok_or_else(|| SiteError::validation("date", format!("'{}' is not a date", form.date)))?;
        let service = inner.service.as_ref().ok_or(SiteError::NoServiceSelected)?;
        let slot = inner
            .slots
            .iter()
            .find(|slot| slot.time == form.time)
            .ok_or_else(|| SiteError::SlotNotAvailable {
                time: form.time.clone(),
            })?;
        // Slots were loaded for one day; the form must not book another.
        let slot_date = slot.start.with_timezone(&self.hours.offset()).date_naive();
        if date != slot_date {
            return Err(SiteError::validation(
                "date",
                format!("{} does not match the loaded slots of {}", date, slot_date),
            ));
        }

        let formatted_date = format_date_display(date, self.locale);
        let request = BookingRequest {
            name: form.name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            service_name: service.name.clone(),
            duration: service.duration,
            date: form.date.clone(),
            time: form.time.clone(),
            formatted_date: formatted_date.clone(),
            formatted_time: slot.display.clone(),
            start_time: slot
                .start
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            end_time: slot
                .end
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            location: self.location.clone(),
        };
        let confirmation = BookingConfirmation {
            service: service.name.clone(),
            date: formatted_date,
            time: slot.display.clone(),
        };
        Ok((request, confirmation))
    }
}
