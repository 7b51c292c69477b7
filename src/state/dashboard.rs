// Dashboard state.
// Selected month, member filter, and the loaded panels.

use crate::backend::{Announcement, Member};
use crate::period::Period;
use crate::report::{FinancialSummary, ReportScope};
use crate::service::StatusLookup;

use super::loading::LoadingState;

#[derive(Debug)]
pub struct DashboardState {
    pub club_name: String,
    pub period: Period,
    pub members: LoadingState<Vec<Member>>,
    /// Index into the loaded members; `None` means everyone.
    pub member_filter: Option<usize>,
    pub status: LoadingState<StatusLookup>,
    /// Set while a stale breakdown is on screen and a refresh is queued.
    pub revalidating: bool,
    pub summary: LoadingState<FinancialSummary>,
    pub announcements: LoadingState<Vec<Announcement>>,
    /// One-line message for the status bar.
    pub notice: Option<String>,
    pub show_help: bool,
}

impl DashboardState {
    pub fn new(club_name: impl Into<String>, period: Period) -> Self {
        Self {
            club_name: club_name.into(),
            period,
            members: LoadingState::Idle,
            member_filter: None,
            status: LoadingState::Idle,
            revalidating: false,
            summary: LoadingState::Idle,
            announcements: LoadingState::Idle,
            notice: None,
            show_help: false,
        }
    }

    pub fn selected_member(&self) -> Option<&Member> {
        let index = self.member_filter?;
        self.members.data().and_then(|members| members.get(index))
    }

    pub fn selected_member_id(&self) -> Option<&str> {
        self.selected_member().map(|m| m.id.as_str())
    }

    /// Label of the current scope.
    pub fn scope_label(&self) -> &str {
        self.selected_member()
            .map(|m| m.name.as_str())
            .unwrap_or("Todos os associados")
    }

    /// Scope of a report exported from the current view.
    pub fn report_scope(&self) -> ReportScope {
        match self.selected_member() {
            Some(member) => ReportScope::Member {
                id: member.id.clone(),
                name: member.name.clone(),
            },
            None => ReportScope::Club,
        }
    }

    /// Step the member filter: everyone, then each member in turn, then everyone again.
    pub fn cycle_member(&mut self) {
        let count = self.members.data().map(|m| m.len()).unwrap_or(0);
        self.member_filter = match self.member_filter {
            _ if count == 0 => None,
            None => Some(0),
            Some(i) if i + 1 < count => Some(i + 1),
            Some(_) => None,
        };
    }

    pub fn next_period(&mut self) {
        self.period = self.period.next();
        self.clear_period_data();
    }

    pub fn prev_period(&mut self) {
        self.period = self.period.prev();
        self.clear_period_data();
    }

    fn clear_period_data(&mut self) {
        self.status = LoadingState::Idle;
        self.summary = LoadingState::Idle;
        self.revalidating = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, name: &str) -> Member {
        Member {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
            phone: None,
            active: true,
            joined_at: None,
        }
    }

    #[test]
    fn test_cycle_member_wraps_to_everyone() {
        let mut state = DashboardState::new("Clube", Period::new(2024, 6).unwrap());
        state.members = LoadingState::Loaded(vec![member("a", "Ana"), member("b", "Bruno")]);

        assert_eq!(state.scope_label(), "Todos os associados");
        assert_eq!(state.report_scope(), ReportScope::Club);
        state.cycle_member();
        assert_eq!(state.selected_member_id(), Some("a"));
        state.cycle_member();
        assert_eq!(state.scope_label(), "Bruno");
        state.cycle_member();
        assert!(state.selected_member().is_none());
    }

    #[test]
    fn test_cycle_member_without_members() {
        let mut state = DashboardState::new("Clube", Period::new(2024, 6).unwrap());
        state.cycle_member();
        assert!(state.member_filter.is_none());
    }

    #[test]
    fn test_period_change_clears_month_data() {
        let mut state = DashboardState::new("Clube", Period::new(2024, 12).unwrap());
        state.summary = LoadingState::Loaded(FinancialSummary::default());
        state.revalidating = true;

        state.next_period();

        assert_eq!(state.period, Period::new(2025, 1).unwrap());
        assert!(matches!(state.summary, LoadingState::Idle));
        assert!(!state.revalidating);
    }
}
