use crate::adapters::storage::FileStorage;
use crate::config::cli::{Command, LangCommand, ReviewCommand};
use crate::config::toml_config::{SiteConfig, TransportKind};
use crate::core::booking::{BookingModal, SlotListing};
use crate::core::catalog::ServiceCatalog;
use crate::core::filter::ServiceFilter;
use crate::core::i18n::{LocaleTables, TaggedText, Translator};
use crate::core::reviews::{seed_reviews, ReviewBoard};
use crate::core::slots::format_date_display;
use crate::domain::model::{BookingForm, Category, Locale};
use crate::domain::ports::{BookingTransport, ConfigProvider};
use crate::utils::error::{Result, SiteError};
use chrono::NaiveDate;
use std::fmt::Write;

/// Run one CLI command against the site engine and return what to print.
pub async fn execute(config: &SiteConfig, command: &Command) -> Result<String> {
    match command {
        Command::Services { category } => list_services(*category),
        Command::Slots {
            service,
            date,
            transport,
        } => list_slots(config, *transport, service, *date).await,
        Command::Book {
            service,
            date,
            time,
            name,
            email,
            phone,
            transport,
        } => {
            let form = BookingForm {
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                date: date.format("%Y-%m-%d").to_string(),
                time: time.clone(),
            };
            book(config, *transport, service, *date, form).await
        }
        Command::Review { action } => review(config, action).await,
        Command::Lang { action } => lang(config, action).await,
    }
}

fn list_services(category: Option<Category>) -> Result<String> {
    let catalog = ServiceCatalog::embedded()?;
    let mut filter = ServiceFilter::from_catalog(&catalog);
    filter.apply(category.unwrap_or_default().as_str());

    let mut out = String::new();
    for card in filter.visible() {
        let service = catalog.get(&card.service_id)?;
        let _ = writeln!(
            out,
            "{:<24} {:<36} {:>4} min  ${}",
            service.id, service.name, service.duration, service.price
        );
    }
    Ok(out)
}

fn modal(
    config: &SiteConfig,
    transport: Option<TransportKind>,
) -> Result<BookingModal<Box<dyn BookingTransport>>> {
    let transport = config.build_transport_of(transport.unwrap_or(config.booking.transport))?;
    Ok(
        BookingModal::new(transport, ServiceCatalog::embedded()?, config.business_hours())
            .with_location(config.location()),
    )
}

async fn list_slots(
    config: &SiteConfig,
    transport: Option<TransportKind>,
    service_id: &str,
    date: NaiveDate,
) -> Result<String> {
    let modal = modal(config, transport)?;
    let service = modal.open(service_id).await?;
    let listing = modal.select_date(date).await?;

    let mut out = format!(
        "{} ({} min), {}\n",
        service.name,
        service.duration,
        format_date_display(date, Locale::Es)
    );
    match listing {
        SlotListing::Available(slots) => {
            for slot in slots {
                let _ = writeln!(out, "  {}  {}", slot.time, slot.display);
            }
        }
        SlotListing::Empty => out.push_str("  No hay horarios disponibles para esta fecha\n"),
        SlotListing::NeedsAuthorization { auth_url } => {
            return Err(SiteError::AuthorizationRequired { auth_url });
        }
        SlotListing::Unavailable(reason) => {
            let _ = writeln!(out, "  Error al cargar horarios: {}", reason);
        }
    }
    Ok(out)
}

async fn book(
    config: &SiteConfig,
    transport: Option<TransportKind>,
    service_id: &str,
    date: NaiveDate,
    form: BookingForm,
) -> Result<String> {
    let modal = modal(config, transport)?;
    modal.open(service_id).await?;

    match modal.select_date(date).await? {
        SlotListing::Available(_) => {}
        SlotListing::NeedsAuthorization { auth_url } => {
            return Err(SiteError::AuthorizationRequired { auth_url });
        }
        SlotListing::Empty | SlotListing::Unavailable(_) => {
            return Err(SiteError::SlotNotAvailable { time: form.time });
        }
    }
    modal.select_time(&form.time).await?;

    let confirmation = modal.submit(form).await?;
    Ok(format!(
        "¡Reserva confirmada!\n  Servicio: {}\n  Fecha: {}\n  Hora: {}\n",
        confirmation.service, confirmation.date, confirmation.time
    ))
}

async fn review(config: &SiteConfig, action: &ReviewCommand) -> Result<String> {
    let storage = FileStorage::new(config.storage_path());
    let mut board = ReviewBoard::load(storage, seed_reviews()?, config.reviews).await;

    match action {
        ReviewCommand::Add {
            name,
            rating,
            comment,
        } => {
            let card = board.submit(name, *rating, comment).await?;
            Ok(format!(
                "¡Gracias por tu reseña, {}! ({}/5)\n",
                card.review.name, card.review.rating
            ))
        }
        ReviewCommand::List { pages } => {
            for _ in 0..*pages {
                if board.load_more() == 0 {
                    break;
                }
            }

            let mut out = String::new();
            for card in board.visible_cards() {
                let stars: String = card
                    .stars()
                    .iter()
                    .map(|filled| if *filled { '★' } else { '☆' })
                    .collect();
                let _ = writeln!(
                    out,
                    "[{}] {} {} ({})\n    {}",
                    card.initials, stars, card.review.name, card.review.date, card.review.comment
                );
            }
            if board.controls().more_visible {
                let remaining = board.stored().len() + board.seed_count() - board.visible_cards().len();
                let _ = writeln!(out, "... {} reseñas más", remaining);
            }
            Ok(out)
        }
    }
}

async fn lang(config: &SiteConfig, action: &LangCommand) -> Result<String> {
    let storage = FileStorage::new(config.storage_path());
    let mut translator = Translator::load(storage, LocaleTables::embedded()?).await;
    let mut nodes = vec![TaggedText::new("nav.home", "Inicio")];

    match action {
        LangCommand::Get => {}
        LangCommand::Set { locale } => {
            translator.change(*locale, &mut nodes).await;
        }
        LangCommand::Toggle => {
            translator.toggle(&mut nodes).await;
        }
    }

    translator.apply(&mut nodes);
    let button = translator.toggle_button();
    Ok(format!(
        "{} ({}: {})\n",
        button.label, nodes[0].key, nodes[0].text
    ))
}
