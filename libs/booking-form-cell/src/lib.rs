pub mod form;
pub mod gateway;
pub mod time_slots;
pub mod wizard;

pub use form::{FieldErrors, FormData, FormField, FormValidator};
pub use gateway::{BookingGateway, GatewayError, HttpBookingGateway, LocalBookingGateway};
pub use time_slots::DayPeriod;
pub use wizard::{BookingConfirmation, BookingWizard, Notification, NotificationKind, WizardError, WizardStep};
