#![forbid(unsafe_code)]

pub mod admin_gate;
pub mod app_services;
pub mod config_service;
pub mod error;
pub mod export_service;
pub mod pdf_source;
pub mod response_service;
pub mod settings;

pub use review_core::Clock;

pub use admin_gate::AdminGate;
pub use app_services::AppServices;
pub use config_service::{ConfigService, ConfigSource, LoadedConfig};
pub use error::{AppServicesError, ConfigError, ExportError, ResponseServiceError};
pub use export_service::{ExportReport, ExportService, ExportSnapshot};
pub use pdf_source::{PdfSource, read_local_pdf, resolve_pdf_source};
pub use response_service::{DocumentState, OpenedSession, ResponseService, SaveOutcome};
pub use settings::ReviewSettings;
