//! The transition table: the single place that decides which role may move a
//! booking from which status with which command, and where it lands.
//!
//! Everything else in the engine asks this table; there are no per-call-site
//! status checks. A `(status, command)` pair no role may perform is an
//! invalid transition; a pair only another role may perform is an
//! authorization failure.

use crate::error::BookingError;
use crate::types::{BookingStatus, Role};

/// The table-governed commands (sub-protocol and override actions have their
/// own validation and do not appear here).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// Admin routes the request to the partner
    Assign,
    /// Admin turns the request down (at triage or payment verification)
    Reject,
    /// Partner accepts the assignment
    Accept,
    /// Partner declines the assignment
    Decline,
    /// Customer reports the payment as made
    MarkPaid,
    /// Admin confirms the payment arrived
    Verify,
    /// A party calls the booking off
    Cancel,
    /// Admin or partner marks the service delivered
    Complete,
    /// Partner opens a reschedule proposal
    ProposeReschedule,
    /// Customer answers a reschedule proposal
    RespondReschedule,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Assign => "assign",
            Self::Reject => "reject",
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::MarkPaid => "mark-paid",
            Self::Verify => "verify",
            Self::Cancel => "cancel",
            Self::Complete => "complete",
            Self::ProposeReschedule => "propose-reschedule",
            Self::RespondReschedule => "respond-to-reschedule",
        };
        write!(f, "{label}")
    }
}

/// One row of the table: who may do it, and where it lands.
struct Row {
    roles: &'static [Role],
    to: BookingStatus,
}

const fn row(roles: &'static [Role], to: BookingStatus) -> Option<Row> {
    Some(Row { roles, to })
}

fn lookup(from: BookingStatus, command: CommandKind) -> Option<Row> {
    use BookingStatus as S;
    use CommandKind as C;
    use Role::{Admin, Customer, Partner};

    match (from, command) {
        (S::PendingAdminApproval, C::Assign) => row(&[Admin], S::PendingPartnerApproval),
        (S::PendingAdminApproval, C::Reject) => row(&[Admin], S::Rejected),
        (S::PendingAdminApproval, C::Cancel) => row(&[Customer], S::Cancelled),

        (S::PendingPartnerApproval, C::Accept) => row(&[Partner], S::ApprovedPendingPayment),
        (S::PendingPartnerApproval, C::Decline) => row(&[Partner], S::Rejected),
        (S::PendingPartnerApproval, C::Cancel) => row(&[Admin, Partner], S::Cancelled),

        (S::ApprovedPendingPayment, C::MarkPaid) => row(&[Customer], S::PaymentVerifying),
        (S::ApprovedPendingPayment, C::Cancel) => row(&[Admin, Partner], S::Cancelled),

        (S::PaymentVerifying, C::Verify) => row(&[Admin], S::Confirmed),
        (S::PaymentVerifying, C::Reject) => row(&[Admin], S::Rejected),

        (S::Confirmed, C::Cancel) => row(&[Admin, Partner], S::Cancelled),
        (S::Confirmed, C::ProposeReschedule) => row(&[Partner], S::RescheduleRequested),
        (S::Confirmed, C::Complete) => row(&[Admin, Partner], S::Completed),

        (S::RescheduleRequested, C::RespondReschedule) => row(&[Customer], S::Confirmed),

        _ => None,
    }
}

/// Resolves the status the booking lands in when `role` performs `command`
/// from `from`.
///
/// # Errors
///
/// [`BookingError::InvalidTransition`] when no role may perform `command`
/// from `from`; [`BookingError::Unauthorized`] when some role may, but not
/// this one.
pub fn next_status(
    role: Role,
    from: BookingStatus,
    command: CommandKind,
) -> Result<BookingStatus, BookingError> {
    let Some(entry) = lookup(from, command) else {
        return Err(BookingError::invalid_transition(from, command.to_string()));
    };

    if !entry.roles.contains(&role) {
        return Err(BookingError::Unauthorized);
    }

    Ok(entry.to)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use BookingStatus as S;
    use CommandKind as C;
    use Role::{Admin, Customer, Partner};

    #[test]
    fn happy_path_rows_resolve_in_order() {
        assert_eq!(
            next_status(Admin, S::PendingAdminApproval, C::Assign).unwrap(),
            S::PendingPartnerApproval
        );
        assert_eq!(
            next_status(Partner, S::PendingPartnerApproval, C::Accept).unwrap(),
            S::ApprovedPendingPayment
        );
        assert_eq!(
            next_status(Customer, S::ApprovedPendingPayment, C::MarkPaid).unwrap(),
            S::PaymentVerifying
        );
        assert_eq!(
            next_status(Admin, S::PaymentVerifying, C::Verify).unwrap(),
            S::Confirmed
        );
        assert_eq!(
            next_status(Partner, S::Confirmed, C::Complete).unwrap(),
            S::Completed
        );
    }

    #[test]
    fn rejection_branches() {
        assert_eq!(
            next_status(Admin, S::PendingAdminApproval, C::Reject).unwrap(),
            S::Rejected
        );
        assert_eq!(
            next_status(Partner, S::PendingPartnerApproval, C::Decline).unwrap(),
            S::Rejected
        );
        assert_eq!(
            next_status(Admin, S::PaymentVerifying, C::Reject).unwrap(),
            S::Rejected
        );
    }

    #[test]
    fn cancel_rows_split_by_role_and_stage() {
        // Self-cancel only on a fresh request.
        assert_eq!(
            next_status(Customer, S::PendingAdminApproval, C::Cancel).unwrap(),
            S::Cancelled
        );
        assert_eq!(
            next_status(Customer, S::Confirmed, C::Cancel),
            Err(BookingError::Unauthorized)
        );

        for from in [S::PendingPartnerApproval, S::ApprovedPendingPayment, S::Confirmed] {
            assert_eq!(next_status(Admin, from, C::Cancel).unwrap(), S::Cancelled);
            assert_eq!(next_status(Partner, from, C::Cancel).unwrap(), S::Cancelled);
        }
    }

    #[test]
    fn reschedule_rows() {
        assert_eq!(
            next_status(Partner, S::Confirmed, C::ProposeReschedule).unwrap(),
            S::RescheduleRequested
        );
        assert_eq!(
            next_status(Customer, S::RescheduleRequested, C::RespondReschedule).unwrap(),
            S::Confirmed
        );
        // A second proposal cannot open while one is unresolved.
        assert!(matches!(
            next_status(Partner, S::RescheduleRequested, C::ProposeReschedule),
            Err(BookingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn unlisted_pairs_are_invalid_for_every_role() {
        for role in [Customer, Partner, Admin] {
            assert!(matches!(
                next_status(role, S::PendingAdminApproval, C::Complete),
                Err(BookingError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn listed_pairs_with_wrong_role_are_unauthorized() {
        assert_eq!(
            next_status(Customer, S::PendingAdminApproval, C::Assign),
            Err(BookingError::Unauthorized)
        );
        assert_eq!(
            next_status(Admin, S::ApprovedPendingPayment, C::MarkPaid),
            Err(BookingError::Unauthorized)
        );
        assert_eq!(
            next_status(Partner, S::RescheduleRequested, C::RespondReschedule),
            Err(BookingError::Unauthorized)
        );
    }

    #[test]
    fn terminal_statuses_accept_no_table_command() {
        for from in [S::Completed, S::Cancelled, S::Rejected] {
            for command in [C::Assign, C::Accept, C::MarkPaid, C::Verify, C::Complete] {
                assert!(matches!(
                    next_status(Admin, from, command),
                    Err(BookingError::InvalidTransition { .. })
                ));
            }
        }
    }
}
