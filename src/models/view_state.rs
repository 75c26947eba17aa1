use serde::{Deserialize, Serialize};

use super::Appointment;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewingMode {
    #[default]
    Upcoming,
    Past,
}

impl ViewingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewingMode::Upcoming => "upcoming",
            ViewingMode::Past => "past",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentRow {
    pub appointment: Appointment,
    pub is_selected: bool,
}

/// One render pass worth of list data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub mode: ViewingMode,
    pub selected: Option<String>,
    pub rows: Vec<AppointmentRow>,
}

impl ViewState {
    pub fn selected_row(&self) -> Option<&AppointmentRow> {
        self.rows.iter().find(|row| row.is_selected)
    }
}
