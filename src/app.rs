// App state and main event loop.
// Owns the data source and status service; queues fetches between frames.

use std::path::PathBuf;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;

use crate::backend::{Announcement, BackendClient, Expense, Member};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::period::Period;
use crate::report::{self, FinancialSummary, ReportDocument, TextRenderer};
use crate::service::{PaymentSource, PaymentStatusService, StalePolicy};
use crate::state::{DashboardState, LoadingState};
use crate::ui;

const ANNOUNCEMENT_LIMIT: u32 = 5;

/// Everything the dashboard reads besides payments.
#[allow(async_fn_in_trait)]
pub trait ClubData: PaymentSource {
    async fn members(&self) -> Result<Vec<Member>>;
    async fn expenses(&self, period: &Period) -> Result<Vec<Expense>>;
    async fn announcements(&self, limit: u32) -> Result<Vec<Announcement>>;
}

/// Work to run after the next frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Members, status, summary and announcements.
    LoadAll,
    /// Status and summary for the selected month and scope.
    LoadMonth,
    /// Status only, for a new member scope.
    LoadStatus,
    /// Recompute a stale breakdown that is already on screen.
    Revalidate,
    /// Forced refresh of status and summary.
    Refresh,
}

/// Main application state.
pub struct App<C = BackendClient> {
    pub state: DashboardState,
    client: C,
    service: PaymentStatusService,
    stale_policy: StalePolicy,
    reports_dir: Option<PathBuf>,
    pending: Option<Action>,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl<C: ClubData> App<C> {
    pub fn new(config: &Config, client: C, service: PaymentStatusService) -> Self {
        let mut state = DashboardState::new(&config.club_name, config.period);
        state.status = LoadingState::Loading;
        state.members = LoadingState::Loading;

        Self {
            state,
            client,
            service,
            stale_policy: config.stale_policy,
            reports_dir: config.reports_dir.clone(),
            pending: Some(Action::LoadAll),
            should_quit: false,
        }
    }

    /// Main event loop.
    pub async fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, &self.state))?;

            if let Some(action) = self.pending.take() {
                self.perform(action).await;
                continue;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    async fn perform(&mut self, action: Action) {
        tracing::debug!(?action, period = %self.state.period, "performing action");
        match action {
            Action::LoadAll => {
                self.load_members().await;
                self.load_status().await;
                self.load_summary().await;
                self.load_announcements().await;
            }
            Action::LoadMonth => {
                self.load_status().await;
                self.load_summary().await;
            }
            Action::LoadStatus => self.load_status().await,
            Action::Revalidate => self.refresh_status().await,
            Action::Refresh => {
                self.refresh_status().await;
                self.load_summary().await;
            }
        }
    }

    async fn load_members(&mut self) {
        let result = self.client.members().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "failed to load members");
        }
        self.state.members = LoadingState::from_result(result);
    }

    async fn load_status(&mut self) {
        let period = self.state.period;
        let member = self.state.selected_member_id().map(str::to_string);
        let result = self
            .service
            .load(&self.client, &period, member.as_deref(), self.stale_policy)
            .await;

        match &result {
            Ok(lookup) if lookup.needs_revalidation() => {
                self.state.revalidating = true;
                self.pending = Some(Action::Revalidate);
            }
            Ok(_) => self.state.revalidating = false,
            Err(e) => {
                tracing::warn!(error = %e, %period, "failed to load payment status");
                self.state.revalidating = false;
            }
        }
        self.state.status = LoadingState::from_result(result);
    }

    async fn refresh_status(&mut self) {
        let period = self.state.period;
        let member = self.state.selected_member_id().map(str::to_string);
        let result = self
            .service
            .refresh(&self.client, &period, member.as_deref())
            .await;

        self.state.revalidating = false;
        match result {
            Ok(lookup) => self.state.status = LoadingState::Loaded(lookup),
            // A stale breakdown on screen beats an error panel.
            Err(e) if self.state.status.is_loaded() => {
                tracing::warn!(error = %e, %period, "revalidation failed, keeping cached status");
                self.state.notice = Some(format!("Falha ao atualizar: {}", e));
            }
            Err(e) => {
                tracing::warn!(error = %e, %period, "failed to refresh payment status");
                self.state.status = LoadingState::Error(e.to_string());
            }
        }
    }

    async fn load_summary(&mut self) {
        let period = self.state.period;
        let result = async {
            let payments = self.client.fetch_payments(&period, None).await?;
            let expenses = self.client.expenses(&period).await?;
            Ok::<_, AppError>(FinancialSummary::from_records(&payments, &expenses))
        }
        .await;

        if let Err(e) = &result {
            tracing::warn!(error = %e, %period, "failed to load financial summary");
        }
        self.state.summary = LoadingState::from_result(result);
    }

    async fn load_announcements(&mut self) {
        let result = self.client.announcements(ANNOUNCEMENT_LIMIT).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "failed to load announcements");
        }
        self.state.announcements = LoadingState::from_result(result);
    }

    fn queue(&mut self, action: Action) {
        match action {
            Action::LoadStatus => self.state.status = LoadingState::Loading,
            Action::LoadMonth | Action::Refresh => {
                self.state.status = LoadingState::Loading;
                self.state.summary = LoadingState::Loading;
            }
            Action::LoadAll | Action::Revalidate => {}
        }
        self.state.notice = None;
        self.pending = Some(action);
    }

    /// Export the report for the breakdown and member scope on screen.
    fn export_report(&mut self) {
        let Some(lookup) = self.state.status.data() else {
            self.state.notice = Some("Nada para exportar ainda".to_string());
            return;
        };
        let Some(dir) = self.reports_dir.as_deref() else {
            self.state.notice = Some("Diretório de relatórios indisponível".to_string());
            return;
        };

        let document = ReportDocument::assemble(
            &self.state.club_name,
            self.state.period,
            self.state.report_scope(),
            &lookup.breakdown,
            self.state.summary.data().copied(),
            Utc::now(),
        );
        self.state.notice = Some(match report::export(&document, &TextRenderer, dir) {
            Ok(path) => format!("Relatório salvo em {}", path.display()),
            Err(e) => {
                tracing::warn!(error = %e, "report export failed");
                format!("Falha ao exportar: {}", e)
            }
        });
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.state.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?')) {
                self.state.show_help = false;
            } else if code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.show_help = true,
            KeyCode::Char('r') => self.queue(Action::Refresh),
            KeyCode::Char('m') => {
                self.state.cycle_member();
                self.queue(Action::LoadStatus);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.state.prev_period();
                self.queue(Action::LoadMonth);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.state.next_period();
                self.queue(Action::LoadMonth);
            }
            KeyCode::Char('e') => self.export_report(),
            KeyCode::Esc => self.state.notice = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Payment;
    use crate::cache::clock::ManualClock;
    use crate::cache::{FreshnessWindows, NoSnapshot, StatusCache};
    use crate::service::Origin;
    use chrono::Duration;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    struct FakeClub {
        members: Vec<Member>,
        payments: Vec<Payment>,
        offline: AtomicBool,
    }

    impl FakeClub {
        fn new() -> Self {
            let member = |id: &str, name: &str| Member {
                id: id.to_string(),
                name: name.to_string(),
                email: None,
                phone: None,
                active: true,
                joined_at: None,
            };
            let payment = |id: &str, member_id: &str, paid: bool| Payment {
                id: id.to_string(),
                member_id: member_id.to_string(),
                reference_month: "2024-06".to_string(),
                amount: 50.0,
                paid,
                paid_at: None,
            };
            Self {
                members: vec![member("a", "Ana"), member("b", "Bruno")],
                payments: vec![payment("p1", "a", true), payment("p2", "b", false)],
                offline: AtomicBool::new(false),
            }
        }

        fn go_offline(&self) {
            self.offline.store(true, Ordering::SeqCst);
        }

        fn check(&self) -> Result<()> {
            if self.offline.load(Ordering::SeqCst) {
                Err(AppError::Other("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl PaymentSource for FakeClub {
        async fn fetch_payments(
            &self,
            _period: &Period,
            member: Option<&str>,
        ) -> Result<Vec<Payment>> {
            self.check()?;
            Ok(self
                .payments
                .iter()
                .filter(|p| member.is_none_or(|m| p.member_id == m))
                .cloned()
                .collect())
        }
    }

    impl ClubData for FakeClub {
        async fn members(&self) -> Result<Vec<Member>> {
            self.check()?;
            Ok(self.members.clone())
        }

        async fn expenses(&self, _period: &Period) -> Result<Vec<Expense>> {
            self.check()?;
            Ok(Vec::new())
        }

        async fn announcements(&self, _limit: u32) -> Result<Vec<Announcement>> {
            self.check()?;
            Ok(Vec::new())
        }
    }

    fn config(reports_dir: Option<PathBuf>) -> Config {
        Config {
            backend_url: "https://club.example.co".to_string(),
            api_key: "anon".to_string(),
            access_token: None,
            club_name: "Clube".to_string(),
            period: Period::new(2024, 6).unwrap(),
            windows: FreshnessWindows::default(),
            stale_policy: StalePolicy::ServeStale,
            snapshot_path: None,
            reports_dir,
        }
    }

    fn app_with(reports_dir: Option<PathBuf>) -> (App<FakeClub>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = StatusCache::with_clock(NoSnapshot, FreshnessWindows::default(), clock.clone());
        let app = App::new(
            &config(reports_dir),
            FakeClub::new(),
            PaymentStatusService::new(cache),
        );
        (app, clock)
    }

    fn app() -> App<FakeClub> {
        app_with(None).0
    }

    fn origin(app: &App<FakeClub>) -> Option<Origin> {
        app.state.status.data().map(|lookup| lookup.origin)
    }

    async fn run_pending(app: &mut App<FakeClub>) {
        if let Some(action) = app.pending.take() {
            app.perform(action).await;
        }
    }

    #[test]
    fn test_starts_with_full_load() {
        let app = app();
        assert_eq!(app.pending, Some(Action::LoadAll));
        assert!(app.state.status.is_loading());
    }

    #[test]
    fn test_month_navigation_queues_load() {
        let mut app = app();
        app.pending = None;

        app.handle_key(KeyCode::Left);

        assert_eq!(app.state.period, Period::new(2024, 5).unwrap());
        assert_eq!(app.pending, Some(Action::LoadMonth));
        assert!(app.state.summary.is_loading());
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut app = app();
        app.pending = None;

        app.handle_key(KeyCode::Char('?'));
        assert!(app.state.show_help);

        app.handle_key(KeyCode::Char('r'));
        assert!(app.pending.is_none());

        app.handle_key(KeyCode::Esc);
        assert!(!app.state.show_help);
    }

    #[test]
    fn test_export_without_data_sets_notice() {
        let mut app = app();
        app.handle_key(KeyCode::Char('e'));
        assert_eq!(app.state.notice.as_deref(), Some("Nada para exportar ainda"));
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_full_load_fills_every_panel() {
        let mut app = app();
        run_pending(&mut app).await;

        assert_eq!(app.state.members.data().map(Vec::len), Some(2));
        assert_eq!(origin(&app), Some(Origin::Computed));
        assert!(app.state.summary.is_loaded());
        assert!(app.state.announcements.is_loaded());
        assert!(app.pending.is_none());
    }

    #[tokio::test]
    async fn test_stale_status_is_shown_and_revalidation_queued() {
        let (mut app, clock) = app_with(None);
        run_pending(&mut app).await;

        clock.advance(Duration::days(3));
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Left);
        run_pending(&mut app).await;

        assert_eq!(origin(&app), Some(Origin::Stale));
        assert!(app.state.revalidating);
        assert_eq!(app.pending, Some(Action::Revalidate));
    }

    #[tokio::test]
    async fn test_failed_revalidation_keeps_stale_status() {
        let (mut app, clock) = app_with(None);
        run_pending(&mut app).await;
        clock.advance(Duration::days(3));
        app.load_status().await;
        assert_eq!(app.pending, Some(Action::Revalidate));

        app.client.go_offline();
        run_pending(&mut app).await;

        assert_eq!(origin(&app), Some(Origin::Stale));
        assert!(!app.state.revalidating);
        let notice = app.state.notice.as_deref().unwrap();
        assert!(notice.starts_with("Falha ao atualizar"));
    }

    #[tokio::test]
    async fn test_successful_revalidation_replaces_status() {
        let (mut app, clock) = app_with(None);
        run_pending(&mut app).await;
        clock.advance(Duration::days(3));
        app.load_status().await;

        run_pending(&mut app).await;

        assert_eq!(origin(&app), Some(Origin::Computed));
        assert!(!app.state.revalidating);
        assert!(app.state.notice.is_none());
        assert!(app.pending.is_none());
    }

    #[tokio::test]
    async fn test_refresh_without_data_shows_error() {
        let mut app = app();
        app.pending = None;
        app.client.go_offline();

        app.handle_key(KeyCode::Char('r'));
        run_pending(&mut app).await;

        assert!(matches!(app.state.status, LoadingState::Error(_)));
    }

    #[tokio::test]
    async fn test_member_export_is_named_for_the_member() {
        let temp_dir = TempDir::new().unwrap();
        let (mut app, _) = app_with(Some(temp_dir.path().to_path_buf()));
        run_pending(&mut app).await;

        // Everyone, then Ana, then Bruno.
        app.handle_key(KeyCode::Char('m'));
        run_pending(&mut app).await;
        app.handle_key(KeyCode::Char('m'));
        run_pending(&mut app).await;
        assert_eq!(app.state.scope_label(), "Bruno");

        app.handle_key(KeyCode::Char('e'));

        let member_report = temp_dir.path().join("relatorio-2024-06-b.txt");
        let text = std::fs::read_to_string(&member_report).unwrap();
        assert!(text.contains("Abrangência: Bruno"));
        assert!(!text.contains("Resumo financeiro"));
        assert!(!temp_dir.path().join("relatorio-2024-06.txt").exists());

        app.handle_key(KeyCode::Char('m'));
        run_pending(&mut app).await;
        app.handle_key(KeyCode::Char('e'));

        let club_report = temp_dir.path().join("relatorio-2024-06.txt");
        let text = std::fs::read_to_string(&club_report).unwrap();
        assert!(text.contains("Abrangência: Todos os associados"));
        assert!(member_report.exists());
    }
}
