use serde::{Deserialize, Serialize};

use crate::tree::{Dir, VDir};

/// Behavioural knobs consulted by navigation and by the reference node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Which child of a stacked node (e.g. a fraction) horizontal movement
    /// enters. `None` enters the child nearest the direction of travel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_right_into: Option<VDir>,
    /// Side chosen when vertical movement lands exactly on a node's midpoint.
    pub vertical_tie: Dir,
    /// Whether runs of alike symbols move and select as one word.
    pub word_boundaries: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            left_right_into: None,
            vertical_tie: Dir::Left,
            word_boundaries: true,
        }
    }
}
