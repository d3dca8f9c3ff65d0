use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Service not found: {id}")]
    ServiceNotFound { id: String },

    #[error("No service selected")]
    NoServiceSelected,

    #[error("Time slot not available: {time}")]
    SlotNotAvailable { time: String },

    #[error("A booking submission is already in progress")]
    SubmissionInProgress,

    #[error("Backend is not authorized")]
    AuthorizationRequired { auth_url: Option<String> },

    #[error("Backend session expired, re-authorization needed")]
    NeedsReauth,

    #[error("Backend rejected the request ({status}): {message}")]
    BackendError { status: u16, message: String },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        SiteError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SiteError::ValidationError { .. }
            | SiteError::SlotNotAvailable { .. }
            | SiteError::SubmissionInProgress => ErrorSeverity::Low,
            SiteError::HttpError(_)
            | SiteError::Timeout { .. }
            | SiteError::AuthorizationRequired { .. }
            | SiteError::NeedsReauth => ErrorSeverity::Medium,
            SiteError::BackendError { .. }
            | SiteError::ServiceNotFound { .. }
            | SiteError::NoServiceSelected
            | SiteError::SerializationError(_) => ErrorSeverity::High,
            SiteError::IoError(_)
            | SiteError::TomlError(_)
            | SiteError::ConfigError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Text shown to the visitor in the alert dialog.
    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::ValidationError { field, .. } if field == "email" => {
                "Por favor ingresa un correo electrónico válido".to_string()
            }
            SiteError::ValidationError { field, .. } if field == "rating" => {
                "Por favor selecciona una calificación".to_string()
            }
            SiteError::ValidationError { field, .. } if field == "date" => {
                "Por favor selecciona una fecha válida".to_string()
            }
            SiteError::ValidationError { .. } => "Por favor completa todos los campos".to_string(),
            SiteError::ServiceNotFound { .. } => {
                "Error: Servicio no encontrado. Por favor recarga la página.".to_string()
            }
            SiteError::NoServiceSelected => {
                "Error: Servicio no seleccionado. Por favor, cierra y vuelve a abrir el modal de reserva."
                    .to_string()
            }
            SiteError::SlotNotAvailable { .. } => {
                "Por favor selecciona un horario válido".to_string()
            }
            SiteError::SubmissionInProgress => "Ya hay una reserva en proceso".to_string(),
            SiteError::AuthorizationRequired { .. } => {
                "Necesitas autorizar la aplicación para continuar.".to_string()
            }
            SiteError::NeedsReauth => {
                "Tu sesión expiró. Por favor autoriza la aplicación nuevamente.".to_string()
            }
            SiteError::Timeout { .. } => {
                "Error al procesar la reserva. La solicitud tardó demasiado tiempo. Por favor intenta de nuevo."
                    .to_string()
            }
            SiteError::HttpError(_) => {
                "Error al procesar la reserva. No se pudo conectar con el servidor.".to_string()
            }
            SiteError::BackendError { message, .. } => {
                format!("Error al procesar la reserva: {}", message)
            }
            other => format!("Error: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SiteError::ValidationError { .. } | SiteError::SlotNotAvailable { .. } => {
                "Revisa los datos del formulario e intenta de nuevo"
            }
            SiteError::AuthorizationRequired { .. } | SiteError::NeedsReauth => {
                "Abre la URL de autorización y vuelve a intentar la reserva"
            }
            SiteError::HttpError(_) | SiteError::Timeout { .. } => {
                "Verifica tu conexión a internet o contacta al barbero directamente"
            }
            SiteError::SubmissionInProgress => "Espera a que termine la reserva en curso",
            SiteError::ServiceNotFound { .. } | SiteError::NoServiceSelected => {
                "Consulta la lista de servicios disponibles"
            }
            SiteError::BackendError { .. } | SiteError::SerializationError(_) => {
                "Intenta de nuevo más tarde"
            }
            SiteError::IoError(_)
            | SiteError::TomlError(_)
            | SiteError::ConfigError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => "Revisa el archivo de configuración",
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
