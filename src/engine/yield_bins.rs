//! Bin/yield engine
//!
//! Aggregates per-wafer die counts across user-defined bins. Counts are
//! always resolved by bin id straight from the record, so a record keeps
//! reporting a deleted bin's dies (historical accuracy). Display-oriented
//! helpers such as [`YieldEngine::breakdown`] iterate the *current* bin
//! list and report leftovers separately via [`YieldEngine::orphaned_counts`].

use serde::Serialize;

use crate::core::collection::Collection;
use crate::core::error::Result;
use crate::core::identity::EntityId;
use crate::core::store::SharedStore;
use crate::entities::bin::{default_bins, BinDefinition, HexColor};
use crate::entities::yield_record::{BinCount, YieldRecord};

/// Sum of every count in the record
pub fn total_dies(record: &YieldRecord) -> u64 {
    record.bin_counts.iter().map(|c| u64::from(c.count)).sum()
}

/// Count stored for `bin_id`, 0 if the record has none
pub fn bin_count(record: &YieldRecord, bin_id: &EntityId) -> u32 {
    record
        .bin_counts
        .iter()
        .find(|c| &c.bin_id == bin_id)
        .map(|c| c.count)
        .unwrap_or(0)
}

/// `bin_count / total_dies * 100`, 0 for an empty record
pub fn bin_percentage(record: &YieldRecord, bin_id: &EntityId) -> f64 {
    let total = total_dies(record);
    if total == 0 {
        return 0.0;
    }
    f64::from(bin_count(record, bin_id)) / total as f64 * 100.0
}

/// Percentage of the bin named "good" (any case); 0 if no such bin exists
pub fn overall_yield(record: &YieldRecord, bins: &[BinDefinition]) -> f64 {
    bins.iter()
        .find(|b| b.is_good())
        .map(|good| bin_percentage(record, &good.id))
        .unwrap_or(0.0)
}

/// Defects per million for one bin
pub fn dpm(record: &YieldRecord, bin_id: &EntityId) -> f64 {
    bin_percentage(record, bin_id) / 100.0 * 1_000_000.0
}

/// One row of a per-bin breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinShare {
    pub bin_id: EntityId,
    pub name: String,
    pub color: HexColor,
    pub count: u32,
    pub percentage: f64,
    pub dpm: f64,
}

/// Owner of the bin definitions and yield records
pub struct YieldEngine {
    bins: Collection<BinDefinition>,
    records: Collection<YieldRecord>,
}

impl YieldEngine {
    /// Load bins and records; seed the default bins when none are stored
    pub fn open(store: SharedStore, seed_default_bins: bool) -> Result<Self> {
        let bins = if seed_default_bins {
            Collection::load_or_seed(store.clone(), default_bins)?
        } else {
            Collection::load(store.clone())
        };
        Ok(Self {
            bins,
            records: Collection::load(store),
        })
    }

    pub fn bins(&self) -> &[BinDefinition] {
        self.bins.items()
    }

    pub fn records(&self) -> &[YieldRecord] {
        self.records.items()
    }

    pub fn bin(&self, id: &EntityId) -> Option<&BinDefinition> {
        self.bins.get(id)
    }

    /// Case-insensitive lookup by bin name
    pub fn bin_by_name(&self, name: &str) -> Option<&BinDefinition> {
        let wanted = name.trim().to_lowercase();
        self.bins().iter().find(|b| b.name.to_lowercase() == wanted)
    }

    pub fn record(&self, id: &EntityId) -> Option<&YieldRecord> {
        self.records.get(id)
    }

    pub fn add_bin(&mut self, name: &str, color: HexColor) -> Result<EntityId> {
        let bin = BinDefinition::new(name, color)?;
        let id = bin.id;
        self.bins.add(bin)?;
        Ok(id)
    }

    /// Replace a bin definition. Existing records are not touched.
    pub fn update_bin(&mut self, bin: BinDefinition) -> Result<()> {
        bin.validate()?;
        self.bins.update(bin)
    }

    /// Remove a bin definition. Records keep their counts for it.
    pub fn delete_bin(&mut self, id: &EntityId) -> Result<BinDefinition> {
        self.bins.delete(id)
    }

    /// Build and store a record from `(bin id, count)` pairs.
    ///
    /// At least one count must be given and no bin may appear twice.
    pub fn create_record(
        &mut self,
        wafer_name: &str,
        lot_number: &str,
        counts: impl IntoIterator<Item = (EntityId, u32)>,
    ) -> Result<EntityId> {
        let bin_counts: Vec<BinCount> = counts
            .into_iter()
            .map(|(bin_id, count)| BinCount::new(bin_id, count))
            .collect();
        let record = YieldRecord::new(wafer_name, lot_number, bin_counts)?;
        let id = record.id;
        self.records.add(record)?;
        Ok(id)
    }

    pub fn add_record(&mut self, record: YieldRecord) -> Result<()> {
        record.validate()?;
        self.records.add(record)
    }

    pub fn update_record(&mut self, record: YieldRecord) -> Result<()> {
        record.validate()?;
        self.records.update(record)
    }

    pub fn delete_record(&mut self, index: usize) -> Result<YieldRecord> {
        self.records.delete_at(index)
    }

    /// Overall yield against the current bin list
    pub fn overall_yield(&self, record: &YieldRecord) -> f64 {
        overall_yield(record, self.bins())
    }

    /// Mean overall yield across all stored records; 0 when there are none
    pub fn average_yield(&self) -> f64 {
        let records = self.records();
        if records.is_empty() {
            return 0.0;
        }
        records.iter().map(|r| self.overall_yield(r)).sum::<f64>() / records.len() as f64
    }

    /// Per-bin shares for every *current* bin, in bin-list order
    pub fn breakdown(&self, record: &YieldRecord) -> Vec<BinShare> {
        self.bins()
            .iter()
            .map(|bin| BinShare {
                bin_id: bin.id,
                name: bin.name.clone(),
                color: bin.color.clone(),
                count: bin_count(record, &bin.id),
                percentage: bin_percentage(record, &bin.id),
                dpm: dpm(record, &bin.id),
            })
            .collect()
    }

    /// Counts in the record whose bin no longer exists
    pub fn orphaned_counts<'a>(&self, record: &'a YieldRecord) -> Vec<&'a BinCount> {
        record
            .bin_counts
            .iter()
            .filter(|c| self.bins.get(&c.bin_id).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{ToolkitError, ValidationError};
    use crate::core::identity::EntityPrefix;
    use crate::core::store::MemoryStore;

    fn engine() -> YieldEngine {
        YieldEngine::open(MemoryStore::shared(), true).unwrap()
    }

    fn ids(engine: &YieldEngine) -> (EntityId, EntityId, EntityId) {
        let b = engine.bins();
        (b[0].id, b[1].id, b[2].id)
    }

    #[test]
    fn test_default_bins_seeded_once() {
        let store = MemoryStore::shared();
        let mut first = YieldEngine::open(store.clone(), true).unwrap();
        assert_eq!(first.bins().len(), 3);
        first
            .add_bin("Retest", "#0000FF".parse().unwrap())
            .unwrap();

        let second = YieldEngine::open(store, true).unwrap();
        assert_eq!(second.bins().len(), 4);
        assert!(second.bin_by_name("retest").is_some());
    }

    #[test]
    fn test_no_seed_when_disabled() {
        let engine = YieldEngine::open(MemoryStore::shared(), false).unwrap();
        assert!(engine.bins().is_empty());
    }

    #[test]
    fn test_percentages_and_dpm() {
        let mut engine = engine();
        let (good, fail, marginal) = ids(&engine);
        let id = engine
            .create_record("W01", "LOT42", [(good, 95), (fail, 4), (marginal, 1)])
            .unwrap();
        let record = engine.record(&id).unwrap().clone();

        assert_eq!(total_dies(&record), 100);
        assert_eq!(bin_count(&record, &fail), 4);
        assert!((bin_percentage(&record, &good) - 95.0).abs() < 1e-9);
        assert!((engine.overall_yield(&record) - 95.0).abs() < 1e-9);
        assert!((dpm(&record, &fail) - 40_000.0).abs() < 1e-6);
        assert!((dpm(&record, &fail) - bin_percentage(&record, &fail) * 10_000.0).abs() < 1e-6);

        let sum: f64 = engine
            .bins()
            .iter()
            .map(|b| bin_percentage(&record, &b.id))
            .sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_record_is_all_zero() {
        let engine = engine();
        let (good, _, _) = ids(&engine);
        let record = YieldRecord::new("W01", "LOT1", vec![BinCount::new(good, 0)]).unwrap();
        assert_eq!(total_dies(&record), 0);
        assert_eq!(bin_percentage(&record, &good), 0.0);
        assert_eq!(engine.overall_yield(&record), 0.0);
        let sum: f64 = engine
            .bins()
            .iter()
            .map(|b| bin_percentage(&record, &b.id))
            .sum();
        assert_eq!(sum, 0.0);
    }

    #[test]
    fn test_unknown_bin_counts_zero() {
        let engine = engine();
        let (good, _, _) = ids(&engine);
        let record = YieldRecord::new("W", "L", vec![BinCount::new(good, 10)]).unwrap();
        let stranger = EntityId::new(EntityPrefix::Bin);
        assert_eq!(bin_count(&record, &stranger), 0);
        assert_eq!(bin_percentage(&record, &stranger), 0.0);
    }

    #[test]
    fn test_overall_yield_without_good_bin() {
        let mut engine = engine();
        let (good, fail, _) = ids(&engine);
        let id = engine
            .create_record("W", "L", [(good, 9), (fail, 1)])
            .unwrap();
        engine.delete_bin(&good).unwrap();
        let record = engine.record(&id).unwrap();
        assert_eq!(engine.overall_yield(record), 0.0);
    }

    #[test]
    fn test_good_bin_match_is_case_insensitive() {
        let mut engine = YieldEngine::open(MemoryStore::shared(), false).unwrap();
        let good = engine.add_bin("GOOD", "#00FF00".parse().unwrap()).unwrap();
        let bad = engine.add_bin("Reject", "#FF0000".parse().unwrap()).unwrap();
        let id = engine.create_record("W", "L", [(good, 3), (bad, 1)]).unwrap();
        let record = engine.record(&id).unwrap();
        assert!((engine.overall_yield(record) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_deleted_bin_counts_survive() {
        let mut engine = engine();
        let (good, fail, marginal) = ids(&engine);
        let id = engine
            .create_record("W", "L", [(good, 80), (fail, 15), (marginal, 5)])
            .unwrap();
        engine.delete_bin(&marginal).unwrap();

        let record = engine.record(&id).unwrap();
        // Lookup by id still sees the historical count
        assert_eq!(bin_count(record, &marginal), 5);
        assert_eq!(total_dies(record), 100);

        // Display iterates current bins only; the orphan is reported apart
        let shares = engine.breakdown(record);
        assert_eq!(shares.len(), 2);
        let orphans = engine.orphaned_counts(record);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].count, 5);
    }

    #[test]
    fn test_editing_bin_does_not_touch_records() {
        let mut engine = engine();
        let (good, _, _) = ids(&engine);
        let id = engine.create_record("W", "L", [(good, 10)]).unwrap();

        let mut renamed = engine.bin(&good).unwrap().clone();
        renamed.name = "Pass".to_string();
        engine.update_bin(renamed).unwrap();

        let record = engine.record(&id).unwrap();
        assert_eq!(bin_count(record, &good), 10);
        // No bin is called "good" any more
        assert_eq!(engine.overall_yield(record), 0.0);
    }

    #[test]
    fn test_record_crud() {
        let store = MemoryStore::shared();
        let mut engine = YieldEngine::open(store.clone(), true).unwrap();
        let (good, fail, _) = ids(&engine);

        assert!(matches!(
            engine.create_record("W", "L", Vec::new()),
            Err(ToolkitError::Validation(ValidationError::Empty { .. }))
        ));
        assert!(engine.create_record("", "L", [(good, 1)]).is_err());

        let id = engine.create_record("W1", "L", [(good, 5)]).unwrap();
        engine.create_record("W2", "L", [(good, 4), (fail, 1)]).unwrap();
        assert!((engine.average_yield() - 90.0).abs() < 1e-9);

        let mut edited = engine.record(&id).unwrap().clone();
        edited.wafer_name = "W1-rescan".to_string();
        engine.update_record(edited).unwrap();

        let reloaded = YieldEngine::open(store, true).unwrap();
        assert_eq!(reloaded.records()[0].wafer_name, "W1-rescan");
        assert_eq!(reloaded.records().len(), 2);

        let mut engine = reloaded;
        engine.delete_record(0).unwrap();
        assert_eq!(engine.records().len(), 1);
        assert!(matches!(
            engine.delete_record(5),
            Err(ToolkitError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_repeated_bin_is_rejected() {
        let mut engine = engine();
        let (good, fail, _) = ids(&engine);
        let result = engine.create_record("W", "L", [(good, 5), (good, 3), (fail, 2)]);
        assert!(matches!(
            result,
            Err(ToolkitError::Validation(ValidationError::DuplicateBin { .. }))
        ));
        assert!(engine.records().is_empty());
    }

    #[test]
    fn test_update_record_keeps_invariants() {
        let mut engine = engine();
        let (good, fail, _) = ids(&engine);
        let id = engine.create_record("W", "L", [(good, 9), (fail, 1)]).unwrap();
        let original = engine.record(&id).unwrap().clone();

        let mut blank = original.clone();
        blank.wafer_name = "  ".to_string();
        assert!(engine.update_record(blank).is_err());

        let mut empty = original.clone();
        empty.bin_counts.clear();
        assert!(engine.update_record(empty).is_err());

        let mut repeated = original.clone();
        repeated.bin_counts.push(BinCount::new(good, 4));
        assert!(matches!(
            engine.update_record(repeated),
            Err(ToolkitError::Validation(ValidationError::DuplicateBin { .. }))
        ));

        assert_eq!(engine.record(&id).unwrap(), &original);
        let sum: f64 = engine
            .bins()
            .iter()
            .map(|b| bin_percentage(&original, &b.id))
            .sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_bin_rejects_blank_name() {
        let mut engine = engine();
        let (good, _, _) = ids(&engine);
        let mut bin = engine.bin(&good).unwrap().clone();
        bin.name = String::new();
        assert!(engine.update_bin(bin).is_err());
        assert_eq!(engine.bin(&good).unwrap().name, "Good");
    }
}
