use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::models::{Appointment, AppointmentRow, ViewState, ViewingMode};
use crate::services::partition::{partition, Partitioned};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Default)]
struct Inputs {
    mode: ViewingMode,
    selected: Option<String>,
    upcoming: Vec<Appointment>,
    past: Vec<Appointment>,
}

/// Picks the list for `mode` and flags the row matching `selected`.
pub fn derive_view_state(
    mode: ViewingMode,
    selected: Option<&str>,
    upcoming: &[Appointment],
    past: &[Appointment],
) -> ViewState {
    let source = match mode {
        ViewingMode::Upcoming => upcoming,
        ViewingMode::Past => past,
    };
    let rows = source
        .iter()
        .map(|appointment| AppointmentRow {
            is_selected: selected == Some(appointment.id.as_str()),
            appointment: appointment.clone(),
        })
        .collect();

    ViewState {
        mode,
        selected: selected.map(str::to_string),
        rows,
    }
}

fn derive_from(inputs: &Inputs) -> ViewState {
    derive_view_state(
        inputs.mode,
        inputs.selected.as_deref(),
        &inputs.upcoming,
        &inputs.past,
    )
}

/// State container behind the appointments screen.
///
/// Mutations land on a watch channel. A background task waits until the
/// inputs have been quiet for the debounce window, then recomputes the whole
/// list from the latest values and publishes it. Must be created inside a
/// tokio runtime.
pub struct AppointmentsViewModel {
    inputs: watch::Sender<Inputs>,
    rendered: watch::Receiver<ViewState>,
    render_tx: broadcast::Sender<ViewState>,
    task: JoinHandle<()>,
}

impl AppointmentsViewModel {
    pub fn new(debounce: Duration) -> Self {
        let initial = Inputs::default();
        let (rendered_tx, rendered) = watch::channel(derive_from(&initial));
        let (inputs, inputs_rx) = watch::channel(initial);
        let (render_tx, _) = broadcast::channel(16);

        let task = tokio::spawn(run_renderer(
            inputs_rx,
            rendered_tx,
            render_tx.clone(),
            debounce,
        ));

        Self {
            inputs,
            rendered,
            render_tx,
            task,
        }
    }

    pub fn mode(&self) -> ViewingMode {
        self.inputs.borrow().mode
    }

    pub fn selected(&self) -> Option<String> {
        self.inputs.borrow().selected.clone()
    }

    /// Switching to the mode already shown does not trigger a render.
    pub fn set_mode(&self, mode: ViewingMode) {
        self.inputs.send_if_modified(|inputs| {
            if inputs.mode == mode {
                return false;
            }
            inputs.mode = mode;
            true
        });
    }

    /// Selects `id`, or clears the selection when `id` is already selected.
    pub fn toggle_selection(&self, id: &str) {
        self.inputs.send_modify(|inputs| {
            if inputs.selected.as_deref() == Some(id) {
                inputs.selected = None;
            } else {
                inputs.selected = Some(id.to_string());
            }
        });
    }

    pub fn clear_selection(&self) {
        self.inputs.send_if_modified(|inputs| inputs.selected.take().is_some());
    }

    /// Replaces both lists. Previous contents are discarded, never merged.
    pub fn set_partitions(&self, partitioned: Partitioned) {
        self.inputs.send_modify(|inputs| {
            inputs.upcoming = partitioned.upcoming;
            inputs.past = partitioned.past;
        });
    }

    pub fn set_appointments(&self, now: DateTime<Utc>, appointments: Vec<Appointment>) {
        self.set_partitions(partition(now, appointments));
    }

    pub fn upcoming_count(&self) -> usize {
        self.inputs.borrow().upcoming.len()
    }

    pub fn past_count(&self) -> usize {
        self.inputs.borrow().past.len()
    }

    /// Latest rendered state.
    pub fn current(&self) -> ViewState {
        self.rendered.borrow().clone()
    }

    /// Every render pass from now on. Slow consumers skip lagged passes.
    pub fn subscribe(&self) -> impl Stream<Item = ViewState> {
        BroadcastStream::new(self.render_tx.subscribe()).filter_map(|result| match result {
            Ok(state) => Some(state),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "render subscriber lagged");
                None
            }
        })
    }
}

impl Drop for AppointmentsViewModel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_renderer(
    mut inputs: watch::Receiver<Inputs>,
    rendered: watch::Sender<ViewState>,
    render_tx: broadcast::Sender<ViewState>,
    debounce: Duration,
) {
    loop {
        if inputs.changed().await.is_err() {
            return;
        }

        // Restart the window on every change so only the last value in a
        // burst is rendered.
        loop {
            tokio::select! {
                changed = inputs.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(debounce) => break,
            }
        }

        let state = derive_from(&inputs.borrow_and_update());
        tracing::debug!(
            mode = state.mode.as_str(),
            rows = state.rows.len(),
            selected = state.selected.as_deref().unwrap_or("-"),
            "rendering appointments"
        );

        rendered.send_replace(state.clone());
        // No subscribers is fine.
        let _ = render_tx.send(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};

    use crate::models::appointment::sample;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap()
    }

    fn fixtures() -> Vec<Appointment> {
        vec![
            sample("past-1", now() - ChronoDuration::days(2)),
            sample("next-1", now() + ChronoDuration::days(1)),
            sample("past-2", now() - ChronoDuration::days(1)),
            sample("next-2", now() + ChronoDuration::days(7)),
        ]
    }

    fn row_ids(state: &ViewState) -> Vec<&str> {
        state.rows.iter().map(|r| r.appointment.id.as_str()).collect()
    }

    #[test]
    fn test_derive_picks_list_for_mode() {
        let split = partition(now(), fixtures());

        let upcoming = derive_view_state(ViewingMode::Upcoming, None, &split.upcoming, &split.past);
        assert_eq!(row_ids(&upcoming), vec!["next-1", "next-2"]);
        assert!(upcoming.rows.iter().all(|r| !r.is_selected));

        let past = derive_view_state(ViewingMode::Past, None, &split.upcoming, &split.past);
        assert_eq!(row_ids(&past), vec!["past-1", "past-2"]);
    }

    #[test]
    fn test_derive_marks_selected_row() {
        let split = partition(now(), fixtures());
        let state = derive_view_state(
            ViewingMode::Upcoming,
            Some("next-2"),
            &split.upcoming,
            &split.past,
        );
        assert_eq!(state.selected_row().map(|r| r.appointment.id.as_str()), Some("next-2"));
        assert_eq!(state.rows.iter().filter(|r| r.is_selected).count(), 1);

        // Selection from the other tab marks nothing.
        let state = derive_view_state(ViewingMode::Past, Some("next-2"), &split.upcoming, &split.past);
        assert!(state.selected_row().is_none());
        assert_eq!(state.selected.as_deref(), Some("next-2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_selection_twice_clears() {
        let vm = AppointmentsViewModel::new(DEFAULT_DEBOUNCE);
        vm.toggle_selection("a");
        assert_eq!(vm.selected().as_deref(), Some("a"));
        vm.toggle_selection("b");
        assert_eq!(vm.selected().as_deref(), Some("b"));
        vm.toggle_selection("b");
        assert_eq!(vm.selected(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_renders_after_quiet_window() {
        let vm = AppointmentsViewModel::new(DEFAULT_DEBOUNCE);
        assert_eq!(vm.current(), ViewState::default());

        vm.set_appointments(now(), fixtures());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(vm.current().rows.is_empty(), "rendered inside the window");

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(row_ids(&vm.current()), vec!["next-1", "next-2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_latest() {
        let vm = AppointmentsViewModel::new(DEFAULT_DEBOUNCE);
        let mut renders = Box::pin(vm.subscribe());

        vm.set_appointments(now(), fixtures());
        tokio::time::sleep(Duration::from_millis(100)).await;
        vm.set_mode(ViewingMode::Past);
        tokio::time::sleep(Duration::from_millis(100)).await;
        vm.toggle_selection("past-2");

        // 200ms after the last change: still inside the window.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(vm.current().rows.is_empty());

        let first = tokio::time::timeout(Duration::from_secs(1), renders.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.mode, ViewingMode::Past);
        assert_eq!(row_ids(&first), vec!["past-1", "past-2"]);
        assert_eq!(first.selected_row().map(|r| r.appointment.id.as_str()), Some("past-2"));

        let second = tokio::time::timeout(Duration::from_secs(1), renders.next()).await;
        assert!(second.is_err(), "burst should render exactly once");
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_mode_does_not_render() {
        let vm = AppointmentsViewModel::new(DEFAULT_DEBOUNCE);
        let mut renders = Box::pin(vm.subscribe());

        vm.set_mode(ViewingMode::Upcoming);
        vm.clear_selection();

        let render = tokio::time::timeout(Duration::from_secs(1), renders.next()).await;
        assert!(render.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_fetch_replaces_lists() {
        let vm = AppointmentsViewModel::new(DEFAULT_DEBOUNCE);
        vm.set_appointments(now(), fixtures());
        assert_eq!((vm.upcoming_count(), vm.past_count()), (2, 2));

        vm.set_appointments(now(), vec![sample("only", now() + ChronoDuration::hours(1))]);
        assert_eq!((vm.upcoming_count(), vm.past_count()), (1, 0));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(row_ids(&vm.current()), vec!["only"]);
    }
}
