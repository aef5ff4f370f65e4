//! Amphibian count aggregation.
//!
//! Both summaries work over the same filtered subset: records of the target
//! species, egg masses excluded. Blank counts contribute zero.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{AmphibianRecord, LakeCount, LifeStage};

/// Summed counts keyed by `(life stage, survey year)`.
pub type StageYearCounts = BTreeMap<(LifeStage, i32), u64>;

/// Records of `species` (case-insensitive) that are not egg masses.
pub fn filter_records<'a>(records: &'a [AmphibianRecord], species: &str) -> Vec<&'a AmphibianRecord> {
    records
        .iter()
        .filter(|r| r.species.eq_ignore_ascii_case(species) && r.life_stage != LifeStage::EggMass)
        .collect()
}

pub fn counts_by_stage_year(records: &[AmphibianRecord], species: &str) -> StageYearCounts {
    let mut out = StageYearCounts::new();
    for r in filter_records(records, species) {
        *out.entry((r.life_stage, r.year())).or_insert(0) += r.count.unwrap_or(0);
    }
    out
}

/// Lakes with the largest adult + sub-adult totals, at most `n` of them.
///
/// Ordered by descending total; ties go to the lower lake id.
pub fn top_lakes(records: &[AmphibianRecord], species: &str, n: usize) -> Vec<LakeCount> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for r in filter_records(records, species) {
        if r.life_stage.is_post_metamorphic() {
            *totals.entry(r.lake_id.as_str()).or_insert(0) += r.count.unwrap_or(0);
        }
    }

    let mut lakes: Vec<LakeCount> = totals
        .into_iter()
        .map(|(lake_id, total)| LakeCount {
            lake_id: lake_id.to_string(),
            total,
        })
        .collect();
    lakes.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| cmp_lake_id(&a.lake_id, &b.lake_id)));
    lakes.truncate(n);
    lakes
}

/// Numeric order when both ids are integers, lexical otherwise.
fn cmp_lake_id(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Years covered by the stage/year table, ascending and deduplicated.
pub fn years(counts: &StageYearCounts) -> Vec<i32> {
    let mut years: Vec<i32> = counts.keys().map(|&(_, y)| y).collect();
    years.sort_unstable();
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(species: &str, stage: LifeStage, year: i32, lake: &str, count: Option<u64>) -> AmphibianRecord {
        AmphibianRecord {
            species: species.to_string(),
            life_stage: stage,
            survey_date: NaiveDate::from_ymd_opt(year, 7, 15).unwrap(),
            lake_id: lake.to_string(),
            location: None,
            count,
        }
    }

    fn sample_records() -> Vec<AmphibianRecord> {
        vec![
            rec("RAMU", LifeStage::Adult, 2000, "10", Some(4)),
            rec("RAMU", LifeStage::Adult, 2000, "11", Some(6)),
            rec("ramu", LifeStage::SubAdult, 2000, "10", Some(2)),
            rec("RAMU", LifeStage::Tadpole, 2000, "10", Some(100)),
            rec("RAMU", LifeStage::EggMass, 2000, "10", Some(50)),
            rec("RAMU", LifeStage::Adult, 2001, "12", None),
            rec("RAMU", LifeStage::Adult, 2001, "12", Some(1)),
            rec("BUBO", LifeStage::Adult, 2000, "10", Some(999)),
            rec("RAMU", LifeStage::SubAdult, 2002, "13", Some(3)),
            rec("RAMU", LifeStage::Adult, 2002, "14", Some(2)),
            rec("RAMU", LifeStage::Adult, 2002, "9", Some(2)),
        ]
    }

    #[test]
    fn stage_year_sums_match_filtered_subset() {
        let records = sample_records();
        let counts = counts_by_stage_year(&records, "RAMU");

        assert_eq!(counts.get(&(LifeStage::Adult, 2000)), Some(&10));
        assert_eq!(counts.get(&(LifeStage::SubAdult, 2000)), Some(&2));
        assert_eq!(counts.get(&(LifeStage::Tadpole, 2000)), Some(&100));
        assert_eq!(counts.get(&(LifeStage::Adult, 2001)), Some(&1));
        assert!(counts.keys().all(|(stage, _)| *stage != LifeStage::EggMass));

        // Every bucket equals the brute-force sum over the filtered subset.
        for (&(stage, year), &total) in &counts {
            let expected: u64 = records
                .iter()
                .filter(|r| r.species.eq_ignore_ascii_case("RAMU"))
                .filter(|r| r.life_stage == stage && r.year() == year)
                .map(|r| r.count.unwrap_or(0))
                .sum();
            assert_eq!(total, expected, "{stage} {year}");
        }
    }

    #[test]
    fn missing_counts_only_still_yield_zero_bucket() {
        let records = vec![rec("RAMU", LifeStage::Tadpole, 1999, "1", None)];
        let counts = counts_by_stage_year(&records, "RAMU");
        assert_eq!(counts.get(&(LifeStage::Tadpole, 1999)), Some(&0));
    }

    #[test]
    fn no_matching_records_is_empty_not_error() {
        let records = sample_records();
        assert!(counts_by_stage_year(&records, "XXXX").is_empty());
        assert!(top_lakes(&records, "XXXX", 5).is_empty());
        assert!(counts_by_stage_year(&[], "RAMU").is_empty());
    }

    #[test]
    fn top_lakes_excludes_tadpoles_and_ranks_with_tie_break() {
        let records = sample_records();
        let lakes = top_lakes(&records, "RAMU", 5);

        assert_eq!(lakes.len(), 5);
        assert_eq!(lakes[0], LakeCount { lake_id: "10".into(), total: 6 });
        assert_eq!(lakes[1], LakeCount { lake_id: "11".into(), total: 6 });
        assert_eq!(lakes[2], LakeCount { lake_id: "13".into(), total: 3 });
        // "9" and "14" tie at 2; numeric order puts 9 first.
        assert_eq!(lakes[3], LakeCount { lake_id: "9".into(), total: 2 });
        assert_eq!(lakes[4], LakeCount { lake_id: "14".into(), total: 2 });
    }

    #[test]
    fn top_lakes_never_drops_a_larger_lake() {
        let records = sample_records();
        let all = top_lakes(&records, "RAMU", usize::MAX);
        let top = top_lakes(&records, "RAMU", 5);

        let min_included = top.iter().map(|l| l.total).min().unwrap();
        for lake in all.iter().filter(|l| !top.contains(l)) {
            assert!(lake.total <= min_included);
        }
        // Lake 12 has one blank and one counted adult.
        assert!(all.contains(&LakeCount { lake_id: "12".into(), total: 1 }));
    }

    #[test]
    fn lake_id_ordering_falls_back_to_lexical() {
        assert_eq!(cmp_lake_id("9", "10"), Ordering::Less);
        assert_eq!(cmp_lake_id("B", "A10"), Ordering::Greater);
    }

    #[test]
    fn years_are_sorted_and_unique() {
        let counts = counts_by_stage_year(&sample_records(), "RAMU");
        assert_eq!(years(&counts), vec![2000, 2001, 2002]);
    }
}
