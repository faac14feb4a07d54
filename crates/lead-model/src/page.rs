use serde::{Deserialize, Serialize};

/// One page of the lead listing (`GET /leads`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadPage<R> {
    #[serde(default = "Vec::new")]
    pub leads: Vec<R>,
    #[serde(rename = "totalPages", default = "one")]
    pub total_pages: usize,
}

fn one() -> usize {
    1
}

impl<R> Default for LeadPage<R> {
    fn default() -> Self {
        Self {
            leads: Vec::new(),
            total_pages: 1,
        }
    }
}
