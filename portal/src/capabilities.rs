use crate::session::SessionUser;
use db::models::profile::Role;

/// What the acting user may do, derived once from their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub can_change_status: bool,
    pub can_view_all_tickets: bool,
    pub can_create_for_others: bool,
    /// Ticket-insert alerts fire even while the portal is in the foreground.
    pub alert_on_foreground_tickets: bool,
}

impl Capabilities {
    pub fn for_role(role: Role) -> Self {
        let employee = role == Role::Employee;
        Self {
            can_change_status: employee,
            can_view_all_tickets: employee,
            can_create_for_others: employee,
            alert_on_foreground_tickets: employee,
        }
    }

    pub fn for_user(user: &SessionUser) -> Self {
        Self::for_role(user.role)
    }
}
