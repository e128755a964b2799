use serde::{Deserialize, Serialize};

/// Labels picked for an image, one per category table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicDetails { pub genre: String, pub theme: String, pub mood: String }

impl MusicDetails {
    /// Generation prompt: `"<genre>, <theme>, <mood>"`.
    pub fn prompt(&self) -> String {
        format!("{}, {}, {}", self.genre, self.theme, self.mood)
    }
}
