use httpmock::prelude::*;
use johanstyle::core::booking::{ModalState, SlotListing};
use johanstyle::domain::model::{BookingForm, BusinessHours, Category, Service};
use johanstyle::domain::ports::BookingTransport;
use johanstyle::{BackendApiTransport, BookingModal, ServiceCatalog, SiteError};
use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;

fn transport(server: &MockServer) -> BackendApiTransport {
    BackendApiTransport::new(server.base_url(), Duration::from_secs(5)).unwrap()
}

fn corte() -> Service {
    Service {
        id: "corte".to_string(),
        name: "Corte de Cabello".to_string(),
        duration: 30,
        price: 25,
        category: Category::Caballeros,
    }
}

fn booking_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 3, 15).unwrap()
}

fn form(time: &str) -> BookingForm {
    BookingForm {
        name: "Juan Pérez".to_string(),
        email: "juan@example.com".to_string(),
        phone: "3001234567".to_string(),
        date: "2030-03-15".to_string(),
        time: time.to_string(),
    }
}

fn authorized(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/auth/status").query_param_exists("t");
        then.status(200).json_body(json!({ "authenticated": true }));
    })
}

fn availability(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/availability")
            .json_body(json!({ "date": "2030-03-15", "duration": 30 }));
        then.status(200).json_body(json!({
            "availableSlots": [
                {
                    "start": "2030-03-15T09:00:00-05:00",
                    "end": "2030-03-15T09:30:00-05:00",
                    "display": "9:00 AM"
                },
                {
                    "start": "2030-03-15T14:15:00-05:00",
                    "end": "2030-03-15T14:45:00-05:00",
                    "display": "2:15 PM"
                }
            ]
        }));
    })
}

#[tokio::test]
async fn test_fetch_slots_uses_display_as_time() {
    let server = MockServer::start();
    let auth = authorized(&server);
    let slots_mock = availability(&server);

    let slots = transport(&server)
        .fetch_slots(booking_date(), &corte())
        .await
        .unwrap();

    auth.assert();
    slots_mock.assert();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].time, "9:00 AM");
    assert_eq!(slots[1].display, "2:15 PM");
    assert_eq!(slots[1].start.to_rfc3339(), "2030-03-15T14:15:00-05:00");
}

#[tokio::test]
async fn test_unauthorized_backend_reports_auth_url() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/auth/status");
        then.status(200).json_body(json!({ "authenticated": false }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/auth");
        then.status(200)
            .json_body(json!({ "authUrl": "https://accounts.example.com/o/oauth2" }));
    });
    let slots_mock = server.mock(|when, then| {
        when.method(POST).path("/api/availability");
        then.status(200).json_body(json!({ "availableSlots": [] }));
    });

    let result = transport(&server).fetch_slots(booking_date(), &corte()).await;

    match result {
        Err(SiteError::AuthorizationRequired { auth_url }) => {
            assert_eq!(auth_url.as_deref(), Some("https://accounts.example.com/o/oauth2"));
        }
        other => panic!("expected AuthorizationRequired, got {:?}", other),
    }
    slots_mock.assert_hits(0);
}

#[tokio::test]
async fn test_auth_status_failure_counts_as_unauthenticated() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/auth/status");
        then.status(500);
    });

    assert!(!transport(&server).check_auth().await);
}

#[tokio::test]
async fn test_needs_reauth_on_booking() {
    let server = MockServer::start();
    authorized(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/bookings");
        then.status(401)
            .json_body(json!({ "error": "Token expired", "needsReauth": true }));
    });

    let modal = BookingModal::new(
        transport(&server),
        ServiceCatalog::embedded().unwrap(),
        BusinessHours::default(),
    );
    availability(&server);
    modal.open("corte").await.unwrap();
    modal.select_date(booking_date()).await.unwrap();
    modal.select_time("9:00 AM").await.unwrap();

    let result = modal.submit(form("9:00 AM")).await;
    assert!(matches!(result, Err(SiteError::NeedsReauth)));
    assert_eq!(modal.state().await, ModalState::SlotSelected);
    assert_eq!(modal.form().await.name, "Juan Pérez");
    assert!(!modal.is_submitting());
}

#[tokio::test]
async fn test_server_error_message_is_surfaced() {
    let server = MockServer::start();
    authorized(&server);
    availability(&server);
    server.mock(|when, then| {
        when.method(POST).path("/api/bookings");
        then.status(500)
            .json_body(json!({ "error": "Calendar quota exceeded" }));
    });

    let modal = BookingModal::new(
        transport(&server),
        ServiceCatalog::embedded().unwrap(),
        BusinessHours::default(),
    );
    modal.open("corte").await.unwrap();
    modal.select_date(booking_date()).await.unwrap();
    modal.select_time("2:15 PM").await.unwrap();

    match modal.submit(form("2:15 PM")).await {
        Err(SiteError::BackendError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Calendar quota exceeded");
        }
        other => panic!("expected BackendError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_full_booking_flow() {
    let server = MockServer::start();
    authorized(&server);
    availability(&server);
    let booking_mock = server.mock(|when, then| {
        when.method(POST).path("/api/bookings").json_body_partial(
            r#"{
                "name": "Juan Pérez",
                "serviceName": "Corte de Cabello",
                "duration": 30,
                "date": "2030-03-15",
                "time": "2:15 PM",
                "formattedDate": "15 de marzo de 2030",
                "formattedTime": "2:15 PM",
                "startTime": "2030-03-15T19:15:00.000Z",
                "endTime": "2030-03-15T19:45:00.000Z",
                "location": "Carrera 54 #55-53 local 1"
            }"#,
        );
        then.status(200)
            .json_body(json!({ "success": true, "message": "Reserva creada" }));
    });

    let modal = BookingModal::new(
        transport(&server),
        ServiceCatalog::embedded().unwrap(),
        BusinessHours::default(),
    );
    modal.open("corte").await.unwrap();
    let listing = modal.select_date(booking_date()).await.unwrap();
    assert!(matches!(listing, SlotListing::Available(ref slots) if slots.len() == 2));
    modal.select_time("2:15 PM").await.unwrap();

    let confirmation = modal.submit(form("2:15 PM")).await.unwrap();

    booking_mock.assert();
    assert_eq!(confirmation.service, "Corte de Cabello");
    assert_eq!(confirmation.date, "15 de marzo de 2030");
    assert_eq!(confirmation.time, "2:15 PM");
    assert_eq!(modal.state().await, ModalState::Closed);
    assert_eq!(modal.form().await, BookingForm::default());
}

#[tokio::test]
async fn test_incomplete_form_never_reaches_backend() {
    let server = MockServer::start();
    authorized(&server);
    availability(&server);
    let booking_mock = server.mock(|when, then| {
        when.method(POST).path("/api/bookings");
        then.status(200).json_body(json!({ "success": true }));
    });

    let modal = BookingModal::new(
        transport(&server),
        ServiceCatalog::embedded().unwrap(),
        BusinessHours::default(),
    );
    modal.open("corte").await.unwrap();
    modal.select_date(booking_date()).await.unwrap();
    modal.select_time("9:00 AM").await.unwrap();

    let mut incomplete = form("9:00 AM");
    incomplete.phone = "   ".to_string();
    let result = modal.submit(incomplete).await;

    assert!(matches!(result, Err(SiteError::ValidationError { ref field, .. }) if field == "phone"));
    booking_mock.assert_hits(0);
}
