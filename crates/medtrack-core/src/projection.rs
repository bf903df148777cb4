//! Derived projections over fetched datasets
//!
//! Every function here is pure: it takes the last fetched dataset plus the
//! view settings and returns a new list. The stored dataset is never
//! reordered or edited in place.

use medtrack_config::{SortMode, SortOrder};
use medtrack_utils::{contains_ignore_case, locale_compare};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::{PersonnelRecord, TransactionRecord};

/// Coarse status of a fetched dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed,
}

/// A dataset as last seen from the gateway
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(Vec<T>),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

impl<T> LoadState<T> {
    pub fn status(&self) -> LoadStatus {
        match self {
            LoadState::Loading => LoadStatus::Loading,
            LoadState::Ready(_) => LoadStatus::Ready,
            LoadState::Failed(_) => LoadStatus::Failed,
        }
    }

    /// The fetched records, or the reason there are none
    pub fn records(&self) -> CoreResult<&[T]> {
        match self {
            LoadState::Ready(records) => Ok(records),
            LoadState::Loading => Err(CoreError::NotLoaded),
            LoadState::Failed(message) => Err(CoreError::LoadFailed {
                message: message.clone(),
            }),
        }
    }
}

/// Sort transactions by parsed time.
///
/// The sort is stable, so transactions sharing a timestamp keep their fetched
/// order under both orders. Unparseable timestamps count as the oldest.
pub fn sort_transactions(
    records: &[TransactionRecord],
    order: SortOrder,
) -> Vec<TransactionRecord> {
    let mut keyed: Vec<_> = records.iter().map(|r| (r.timestamp(), r)).collect();
    match order {
        SortOrder::Latest => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
        SortOrder::Oldest => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
    }
    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

/// Keep the personnel whose name contains `term`, ignoring case.
///
/// A blank term keeps everyone. A non-blank term is matched as typed,
/// surrounding spaces included.
pub fn filter_personnel<'a>(
    records: &'a [PersonnelRecord],
    term: &str,
) -> Vec<&'a PersonnelRecord> {
    if term.trim().is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|p| contains_ignore_case(&p.name, term))
        .collect()
}

/// Sort personnel by name or hospital.
///
/// Descending modes sort ascending and then reverse the result, so entries
/// that compare equal come out in reverse fetched order.
pub fn sort_personnel(mut records: Vec<&PersonnelRecord>, mode: SortMode) -> Vec<&PersonnelRecord> {
    match mode {
        SortMode::AlphaAsc | SortMode::AlphaDesc => {
            records.sort_by(|a, b| locale_compare(&a.name, &b.name))
        }
        SortMode::HospitalAsc | SortMode::HospitalDesc => {
            records.sort_by(|a, b| locale_compare(&a.affiliation, &b.affiliation))
        }
    }
    if matches!(mode, SortMode::AlphaDesc | SortMode::HospitalDesc) {
        records.reverse();
    }
    records
}

/// Filter then sort
pub fn project_personnel(
    records: &[PersonnelRecord],
    term: &str,
    mode: SortMode,
) -> Vec<PersonnelRecord> {
    sort_personnel(filter_personnel(records, term), mode)
        .into_iter()
        .cloned()
        .collect()
}

/// Full replacement list for an add: the current list plus the candidate
pub fn with_candidate(
    current: &[PersonnelRecord],
    candidate: &PersonnelRecord,
) -> Vec<PersonnelRecord> {
    let mut next = Vec::with_capacity(current.len() + 1);
    next.extend_from_slice(current);
    next.push(candidate.clone());
    next
}

/// Full replacement list for a delete: the current list without the first
/// entry named `name`
pub fn without_first_named(current: &[PersonnelRecord], name: &str) -> Vec<PersonnelRecord> {
    let mut next = current.to_vec();
    if let Some(pos) = next.iter().position(|p| p.name == name) {
        next.remove(pos);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;

    fn tx(id: &str, time: &str) -> TransactionRecord {
        TransactionRecord {
            id: id.to_string(),
            action: Action::Update,
            time: time.to_string(),
            recipient: None,
            updated_by: Some("admin".to_string()),
            commodities: vec![],
        }
    }

    fn ids(records: &[TransactionRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn names(records: &[PersonnelRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn register() -> Vec<PersonnelRecord> {
        vec![
            PersonnelRecord::new("carol", "St Mary"),
            PersonnelRecord::new("Alice", "Omega"),
            PersonnelRecord::new("Bob", "Zeta"),
            PersonnelRecord::new("Dave", "Omega"),
        ]
    }

    #[test]
    fn test_sort_transactions_latest_and_oldest() {
        let records = vec![
            tx("a", "2024-01-02T00:00:00Z"),
            tx("b", "2024-01-03T00:00:00Z"),
            tx("c", "2024-01-01T00:00:00Z"),
        ];
        assert_eq!(ids(&sort_transactions(&records, SortOrder::Latest)), ["b", "a", "c"]);
        assert_eq!(ids(&sort_transactions(&records, SortOrder::Oldest)), ["c", "a", "b"]);
    }

    #[test]
    fn test_sort_transactions_ties_keep_input_order() {
        let records = vec![
            tx("x1", "2024-01-01T10:00:00Z"),
            tx("early", "2023-12-31T10:00:00Z"),
            tx("x2", "2024-01-01T10:00:00Z"),
            tx("x3", "2024-01-01T12:00:00+02:00"),
        ];
        let latest = sort_transactions(&records, SortOrder::Latest);
        let oldest = sort_transactions(&latest, SortOrder::Oldest);
        let again = sort_transactions(&oldest, SortOrder::Latest);

        assert_eq!(ids(&latest), ["x1", "x2", "x3", "early"]);
        assert_eq!(ids(&oldest), ["early", "x1", "x2", "x3"]);
        assert_eq!(ids(&again), ids(&latest));
    }

    #[test]
    fn test_unparseable_time_sorts_oldest() {
        let records = vec![tx("bad", "whenever"), tx("good", "2024-01-01")];
        assert_eq!(ids(&sort_transactions(&records, SortOrder::Latest)), ["good", "bad"]);
        assert_eq!(ids(&sort_transactions(&records, SortOrder::Oldest)), ["bad", "good"]);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let records = register();
        let filtered: Vec<_> = filter_personnel(&records, "A").into_iter().cloned().collect();
        assert_eq!(names(&filtered), ["carol", "Alice", "Dave"]);
    }

    #[test]
    fn test_blank_term_keeps_everyone() {
        let records = register();
        assert_eq!(filter_personnel(&records, "").len(), 4);
        assert_eq!(filter_personnel(&records, "   ").len(), 4);
    }

    #[test]
    fn test_term_is_matched_untrimmed() {
        let records = vec![
            PersonnelRecord::new("Mary Ann", "H1"),
            PersonnelRecord::new("Ann", "H2"),
        ];
        let filtered: Vec<_> = filter_personnel(&records, " ann").into_iter().cloned().collect();
        assert_eq!(names(&filtered), ["Mary Ann"]);
    }

    #[test]
    fn test_sort_modes() {
        let records = register();
        assert_eq!(
            names(&project_personnel(&records, "", SortMode::AlphaAsc)),
            ["Alice", "Bob", "carol", "Dave"]
        );
        assert_eq!(
            names(&project_personnel(&records, "", SortMode::AlphaDesc)),
            ["Dave", "carol", "Bob", "Alice"]
        );
        assert_eq!(
            names(&project_personnel(&records, "", SortMode::HospitalAsc)),
            ["Alice", "Dave", "carol", "Bob"]
        );
        // equal hospitals come out reversed as well
        assert_eq!(
            names(&project_personnel(&records, "", SortMode::HospitalDesc)),
            ["Bob", "carol", "Dave", "Alice"]
        );
    }

    #[test]
    fn test_hospital_sort_two_records() {
        let records = vec![
            PersonnelRecord::new("Bob", "Zeta"),
            PersonnelRecord::new("Alice", "Omega"),
        ];
        assert_eq!(
            names(&project_personnel(&records, "", SortMode::HospitalAsc)),
            ["Alice", "Bob"]
        );
    }

    #[test]
    fn test_accented_names_sort_by_base_letter() {
        let records = vec![
            PersonnelRecord::new("Zack", "Hôpital Nord"),
            PersonnelRecord::new("Émile", "Zeta"),
            PersonnelRecord::new("Frank", "Hospital Central"),
        ];
        assert_eq!(
            names(&project_personnel(&records, "", SortMode::AlphaAsc)),
            ["Émile", "Frank", "Zack"]
        );
        assert_eq!(
            names(&project_personnel(&records, "", SortMode::AlphaDesc)),
            ["Zack", "Frank", "Émile"]
        );
    }

    #[test]
    fn test_accented_hospitals_sort_by_base_letter() {
        let records = vec![
            PersonnelRecord::new("Ann", "Zeta"),
            PersonnelRecord::new("Ben", "Étoile"),
            PersonnelRecord::new("Cy", "Fairview"),
        ];
        assert_eq!(
            names(&project_personnel(&records, "", SortMode::HospitalAsc)),
            ["Ben", "Cy", "Ann"]
        );
    }

    #[test]
    fn test_filter_then_sort() {
        let records = register();
        let projected = project_personnel(&records, "a", SortMode::AlphaDesc);
        assert_eq!(names(&projected), ["Dave", "carol", "Alice"]);
    }

    #[test]
    fn test_with_candidate_appends_once() {
        let current = register();
        let candidate = PersonnelRecord::new("Erin", "H3");
        let next = with_candidate(&current, &candidate);

        assert_eq!(next.len(), current.len() + 1);
        assert_eq!(next.iter().filter(|p| **p == candidate).count(), 1);
        assert_eq!(current.len(), 4);
    }

    #[test]
    fn test_without_first_named() {
        let current = vec![
            PersonnelRecord::new("Alice", "H1"),
            PersonnelRecord::new("Bob", "H2"),
            PersonnelRecord::new("Bob", "H3"),
        ];
        let next = without_first_named(&current, "Bob");
        assert_eq!(
            next,
            vec![PersonnelRecord::new("Alice", "H1"), PersonnelRecord::new("Bob", "H3")]
        );

        let unchanged = without_first_named(&current, "Zed");
        assert_eq!(unchanged, current);
    }

    #[test]
    fn test_load_state_records() {
        let loading: LoadState<PersonnelRecord> = LoadState::Loading;
        assert!(matches!(loading.records(), Err(CoreError::NotLoaded)));
        assert_eq!(loading.status(), LoadStatus::Loading);

        let failed: LoadState<PersonnelRecord> = LoadState::Failed("offline".to_string());
        assert!(matches!(failed.records(), Err(CoreError::LoadFailed { .. })));

        let ready = LoadState::Ready(register());
        assert_eq!(ready.records().unwrap().len(), 4);
    }
}
