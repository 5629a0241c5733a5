use std::{cell::RefCell, rc::Rc};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::json;

use crate::{
    config::Settings,
    error::{ContactError, FieldName, HandoffError},
    logging::Logger,
    notification::{NotificationKind, Notify},
    schedule::Scheduler,
};

pub const ERROR_CLASS: &str = "error";
pub const ERROR_BORDER_COLOR: &str = "#ef4444";
pub const SUBJECT_PREFIX: &str = "Portfolio Contact:";
pub const ACCEPTED_MESSAGE: &str = "Thank you for your message! Opening email client...";
pub const RESET_MESSAGE: &str = "Form has been reset.";

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `local@domain.tld` shape: no whitespace or `@` in any part, and a dot in
/// the domain with text on both sides.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let allowed = |part: &str| !part.is_empty() && !part.chars().any(|c| c == '@' || c.is_whitespace());

    if !allowed(local) || !allowed(domain) {
        return false;
    }

    domain
        .char_indices()
        .any(|(index, c)| c == '.' && index > 0 && index + 1 < domain.len())
}

/// Blur-time check for a single field.
pub fn field_has_error(name: &str, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }
    name == FieldName::Email.as_str() && !is_valid_email(value)
}

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// Reads the raw field values. Whitespace is kept as typed.
    pub fn from_fields(lookup: impl Fn(FieldName) -> Option<String>) -> Self {
        let read = |field| lookup(field).unwrap_or_default();
        Self {
            name: read(FieldName::Name),
            email: read(FieldName::Email),
            subject: read(FieldName::Subject),
            message: read(FieldName::Message),
        }
    }

    fn field(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Subject => &self.subject,
            FieldName::Message => &self.message,
        }
    }

    pub fn validate(&self) -> Result<(), ContactError> {
        if let Some(missing) = FieldName::ALL
            .into_iter()
            .find(|field| self.field(*field).is_empty())
        {
            return Err(ContactError::MissingField(missing));
        }

        if !is_valid_email(&self.email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(())
    }

    pub fn mail_body(&self, signature: &str) -> String {
        format!(
            "Name: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}\n\n---\n{signature}",
            self.name, self.email, self.subject, self.message
        )
        .trim()
        .to_string()
    }

    pub fn mailto_uri(&self, recipient: &str, signature: &str) -> String {
        let subject = encode_component(&format!("{SUBJECT_PREFIX} {}", self.subject));
        let body = encode_component(&self.mail_body(signature));
        format!("mailto:{recipient}?subject={subject}&body={body}")
    }
}

/// Hands a `mailto:` URI to the platform mail handler.
pub trait MailHandoff {
    fn open(&self, uri: &str) -> Result<(), HandoffError>;
}

pub trait FormReset {
    fn reset(&self);
}

pub struct ContactController<S: Scheduler> {
    scheduler: S,
    notifier: Rc<dyn Notify>,
    handoff: Rc<dyn MailHandoff>,
    form: Rc<dyn FormReset>,
    logger: Logger,
    recipient: String,
    signature: String,
    handoff_delay_ms: u32,
    reset_delay_ms: u32,
    pending: RefCell<Vec<S::Task>>,
}

impl<S: Scheduler> ContactController<S> {
    pub fn new(
        scheduler: S,
        notifier: Rc<dyn Notify>,
        handoff: Rc<dyn MailHandoff>,
        form: Rc<dyn FormReset>,
        settings: &Settings,
        logger: Logger,
    ) -> Self {
        Self {
            scheduler,
            notifier,
            handoff,
            form,
            logger,
            recipient: settings.contact_recipient.clone(),
            signature: settings.signature.clone(),
            handoff_delay_ms: settings.mail_handoff_delay_ms,
            reset_delay_ms: settings.form_reset_delay_ms,
            pending: RefCell::new(Vec::new()),
        }
    }

    /// Validates and, when accepted, schedules the mail handoff and the form
    /// reset. A later accepted submission supersedes earlier pending ones.
    pub fn submit(&self, submission: &ContactSubmission) -> Result<(), ContactError> {
        if let Err(error) = submission.validate() {
            self.logger
                .info("contact.rejected", json!({ "reason": error.reason() }));
            self.notifier.notify(&error.to_string(), NotificationKind::Error);
            return Err(error);
        }

        self.logger.info("contact.accepted", json!({}));
        self.notifier.notify(ACCEPTED_MESSAGE, NotificationKind::Success);

        let superseded = std::mem::take(&mut *self.pending.borrow_mut());
        drop(superseded);

        let uri = submission.mailto_uri(&self.recipient, &self.signature);
        let handoff_task = {
            let handoff = Rc::clone(&self.handoff);
            let notifier = Rc::clone(&self.notifier);
            let logger = self.logger;
            let recipient = self.recipient.clone();
            self.scheduler.schedule(self.handoff_delay_ms, move || {
                if let Err(error) = handoff.open(&uri) {
                    logger.warn(
                        "contact.handoff_failed",
                        json!({ "error": error.to_string() }),
                    );
                    notifier.notify(
                        &format!("Please send an email manually to: {recipient}"),
                        NotificationKind::Info,
                    );
                }
            })
        };
        let reset_task = {
            let form = Rc::clone(&self.form);
            let notifier = Rc::clone(&self.notifier);
            self.scheduler.schedule(self.reset_delay_ms, move || {
                form.reset();
                notifier.notify(RESET_MESSAGE, NotificationKind::Info);
            })
        };

        self.pending.borrow_mut().extend([handoff_task, reset_task]);
        Ok(())
    }
}
