//! Typed notification events and their per-channel rendering.
//!
//! Each HTTP handler that performs a primary write enqueues one of these
//! variants instead of hand-building message strings at the call site. The
//! fan-out is generic over the variant: one `render` call produces the email
//! subject/body and the push/in-app title/body for a given recipient.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::notification::NotificationKind;
use crate::domain::user::{Recipient, RecipientSelector};

/// Demo-booking states that trigger a notification.
///
/// `requested` deliberately has no representation here: creating a booking
/// does not notify anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoOutcome {
    /// The academy confirmed the demo class.
    Confirmed,
    /// The academy cancelled the demo class.
    Cancelled,
    /// The demo class took place.
    Completed,
}

/// Closed set of notification events produced by the back office.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    /// Greeting sent to a freshly registered account.
    Welcome {
        /// Name the account registered with.
        student_name: String,
    },
    /// Registration heads-up sent to administrators.
    RegistrationAlert {
        /// Name of the new account.
        student_name: String,
        /// Email of the new account.
        student_email: String,
    },
    /// A student was placed into a batch.
    BatchAllocation {
        /// Batch display name.
        batch_name: String,
        /// Course the batch belongs to.
        course_name: String,
        /// Human-readable schedule line.
        schedule: String,
    },
    /// An invoice was raised against a student.
    InvoiceIssued {
        /// Human-readable invoice code.
        invoice_number: String,
        /// Amount due, in the smallest currency unit.
        amount_cents: i64,
        /// Optional due date.
        due_on: Option<NaiveDate>,
    },
    /// An invoice transitioned to `paid`.
    InvoicePaid {
        /// Human-readable invoice code.
        invoice_number: String,
        /// Amount settled, in the smallest currency unit.
        amount_cents: i64,
    },
    /// A notice was published to the academy.
    Notice {
        /// Notice headline.
        title: String,
        /// Notice body.
        body: String,
    },
    /// An academy event was announced.
    EventAnnounced {
        /// Event title.
        title: String,
        /// Event description.
        description: String,
        /// Scheduled start.
        starts_at: DateTime<Utc>,
    },
    /// An exam was graded for a student.
    ExamGraded {
        /// Exam display name.
        exam_name: String,
        /// Awarded grade.
        grade: String,
    },
    /// A book or material was shared with students.
    MaterialShared {
        /// Material title.
        title: String,
        /// Author or source.
        author: String,
    },
    /// A demo booking changed status.
    DemoStatusChanged {
        /// New status of the booking.
        outcome: DemoOutcome,
        /// Course the demo was booked for.
        course_name: String,
    },
}

/// One fan-out request: an event plus the recipients it addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    /// Event to deliver.
    pub event: DomainEvent,
    /// Recipient resolution policy.
    pub recipients: RecipientSelector,
}

/// Channel-specific rendering of one event for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Email subject line.
    pub subject: String,
    /// Plain-text email body; the mail adapter owns HTML framing.
    pub body: String,
    /// Short title for push and in-app display.
    pub push_title: String,
    /// Short body for push and in-app display.
    pub push_body: String,
    /// In-app severity category.
    pub kind: NotificationKind,
}

/// Format an amount held in the smallest currency unit.
fn format_amount(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

impl DomainEvent {
    /// Render this event for one recipient across all channels.
    pub fn render(&self, recipient: &Recipient) -> RenderedMessage {
        match self {
            Self::Welcome { student_name } => RenderedMessage {
                subject: "Welcome to Atelier School of Fine Arts".to_owned(),
                body: format!(
                    "Dear {student_name},\n\nYour registration is complete. \
                     You can now book a demo class or browse our course catalogue.\n\n\
                     We look forward to seeing you at the academy."
                ),
                push_title: "Welcome to Atelier".to_owned(),
                push_body: "Your registration is complete.".to_owned(),
                kind: NotificationKind::Success,
            },
            Self::RegistrationAlert {
                student_name,
                student_email,
            } => RenderedMessage {
                subject: format!("New registration: {student_name}"),
                body: format!(
                    "Hello {},\n\nA new account was registered.\n\n\
                     Name: {student_name}\nEmail: {student_email}",
                    recipient.name
                ),
                push_title: "New registration".to_owned(),
                push_body: format!("{student_name} ({student_email}) just registered."),
                kind: NotificationKind::Info,
            },
            Self::BatchAllocation {
                batch_name,
                course_name,
                schedule,
            } => RenderedMessage {
                subject: format!("You have been added to batch {batch_name}"),
                body: format!(
                    "Dear {},\n\nYou have been allocated to batch {batch_name} \
                     for the course {course_name}.\nSchedule: {schedule}\n\n\
                     See you in class!",
                    recipient.name
                ),
                push_title: "Batch allocation".to_owned(),
                push_body: format!("You were added to {batch_name} ({course_name})."),
                kind: NotificationKind::Success,
            },
            Self::InvoiceIssued {
                invoice_number,
                amount_cents,
                due_on,
            } => {
                let due_line = due_on
                    .map(|d| format!("\nDue date: {d}"))
                    .unwrap_or_default();
                RenderedMessage {
                    subject: format!("Invoice {invoice_number} from Atelier"),
                    body: format!(
                        "Dear {},\n\nInvoice {invoice_number} for {} has been \
                         raised against your account.{due_line}",
                        recipient.name,
                        format_amount(*amount_cents)
                    ),
                    push_title: "New invoice".to_owned(),
                    push_body: format!(
                        "Invoice {invoice_number} for {} is due.",
                        format_amount(*amount_cents)
                    ),
                    kind: NotificationKind::Info,
                }
            }
            Self::InvoicePaid {
                invoice_number,
                amount_cents,
            } => RenderedMessage {
                subject: format!("Payment received for invoice {invoice_number}"),
                body: format!(
                    "Dear {},\n\nWe have received your payment of {} for \
                     invoice {invoice_number}.\n\nThank you!",
                    recipient.name,
                    format_amount(*amount_cents)
                ),
                push_title: "Payment received".to_owned(),
                push_body: format!("Invoice {invoice_number} is settled."),
                kind: NotificationKind::Success,
            },
            Self::Notice { title, body } => RenderedMessage {
                subject: format!("Notice: {title}"),
                body: format!("Dear {},\n\n{body}", recipient.name),
                push_title: title.clone(),
                push_body: truncate(body, 140),
                kind: NotificationKind::Info,
            },
            Self::EventAnnounced {
                title,
                description,
                starts_at,
            } => RenderedMessage {
                subject: format!("Upcoming event: {title}"),
                body: format!(
                    "Dear {},\n\n{description}\n\nStarts: {}",
                    recipient.name,
                    starts_at.format("%Y-%m-%d %H:%M UTC")
                ),
                push_title: format!("Event: {title}"),
                push_body: format!("Starts {}", starts_at.format("%Y-%m-%d %H:%M UTC")),
                kind: NotificationKind::Info,
            },
            Self::ExamGraded { exam_name, grade } => RenderedMessage {
                subject: format!("Your result for {exam_name}"),
                body: format!(
                    "Dear {},\n\nYour exam {exam_name} has been graded.\nGrade: {grade}",
                    recipient.name
                ),
                push_title: "Exam graded".to_owned(),
                push_body: format!("{exam_name}: {grade}"),
                kind: NotificationKind::Success,
            },
            Self::MaterialShared { title, author } => RenderedMessage {
                subject: format!("New study material: {title}"),
                body: format!(
                    "Dear {},\n\nA new material has been shared with you.\n\n\
                     Title: {title}\nAuthor: {author}",
                    recipient.name
                ),
                push_title: "New material".to_owned(),
                push_body: format!("{title} by {author}"),
                kind: NotificationKind::Info,
            },
            Self::DemoStatusChanged {
                outcome,
                course_name,
            } => {
                let (subject, line, kind) = match outcome {
                    DemoOutcome::Confirmed => (
                        format!("Your demo class for {course_name} is confirmed"),
                        "Your demo class has been confirmed. We look forward to \
                         meeting you."
                            .to_owned(),
                        NotificationKind::Success,
                    ),
                    DemoOutcome::Cancelled => (
                        format!("Your demo class for {course_name} was cancelled"),
                        "Unfortunately your demo class had to be cancelled. \
                         Please book a new slot at your convenience."
                            .to_owned(),
                        NotificationKind::Error,
                    ),
                    DemoOutcome::Completed => (
                        format!("Thanks for attending the {course_name} demo"),
                        "We hope you enjoyed the demo class. Reply to this email \
                         to enrol in the full course."
                            .to_owned(),
                        NotificationKind::Info,
                    ),
                };
                RenderedMessage {
                    subject: subject.clone(),
                    body: format!("Dear {},\n\n{line}", recipient.name),
                    push_title: subject,
                    push_body: line,
                    kind,
                }
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_owned()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}\u{2026}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn recipient() -> Recipient {
        Recipient {
            user_id: Some(7),
            name: "Mira Kapoor".to_owned(),
            email: "mira@example.com".to_owned(),
        }
    }

    #[test]
    fn welcome_addresses_the_student() {
        let message = DomainEvent::Welcome {
            student_name: "Mira Kapoor".to_owned(),
        }
        .render(&recipient());
        assert!(message.body.contains("Dear Mira Kapoor"));
        assert_eq!(message.kind, NotificationKind::Success);
    }

    #[test]
    fn invoice_amounts_render_with_two_decimals() {
        let message = DomainEvent::InvoicePaid {
            invoice_number: "INV-2025-0042".to_owned(),
            amount_cents: 150_050,
        }
        .render(&recipient());
        assert!(message.body.contains("1500.50"));
        assert!(message.subject.contains("INV-2025-0042"));
    }

    #[rstest]
    #[case(DemoOutcome::Confirmed, NotificationKind::Success, "confirmed")]
    #[case(DemoOutcome::Cancelled, NotificationKind::Error, "cancelled")]
    #[case(DemoOutcome::Completed, NotificationKind::Info, "demo")]
    fn demo_status_selects_message_by_outcome(
        #[case] outcome: DemoOutcome,
        #[case] kind: NotificationKind,
        #[case] fragment: &str,
    ) {
        let message = DomainEvent::DemoStatusChanged {
            outcome,
            course_name: "Watercolour Basics".to_owned(),
        }
        .render(&recipient());
        assert_eq!(message.kind, kind);
        assert!(
            message.subject.to_lowercase().contains(fragment),
            "subject {:?} should mention {fragment}",
            message.subject
        );
    }

    #[test]
    fn long_notice_bodies_are_truncated_for_push() {
        let body = "x".repeat(500);
        let message = DomainEvent::Notice {
            title: "Holiday".to_owned(),
            body,
        }
        .render(&recipient());
        assert!(message.push_body.chars().count() <= 140);
        assert!(message.push_body.ends_with('\u{2026}'));
    }
}
