use std::collections::HashSet;

use pretty_assertions::assert_eq;
use rarerank_common::Criterion;
use rarerank_ranker::curated_provider::CuratedDataAdapter;
use rarerank_ranker::mock_provider::MockDiseaseData;
use rarerank_ranker::BatchRanker;
use rarerank_test_utils::{disease_batch, sample_config, sample_diseases, CuratedDataDir};

/// Varied synthetic data for the diseases of `disease_batch`.
fn batch_data(n: usize) -> MockDiseaseData {
    let classes = ["<1 / 1 000 000", "1-9 / 100 000", "1-5 / 10 000", "unmapped"];
    let mut data = MockDiseaseData::new();
    for i in 0..n {
        let code = (1000 + i).to_string();
        data = data
            .with_prevalence(&code, classes[i % classes.len()])
            .with_spanish_trials(&code, i % 7)
            .with_eu_trials(&code, i % 3);
        if i % 2 == 0 {
            data = data.with_genes(&code, &["G1"]);
        }
        if i % 5 == 0 {
            data = data.with_groups(&code, &["U1", "U2"]);
        }
        if i % 4 == 0 {
            data = data.with_eu_tradename_drugs(&code, &["D1", "D2", "D3"]);
        }
    }
    data
}

#[test]
fn test_malformed_record_excludes_only_that_disease() {
    let config = sample_config();
    let diseases = disease_batch(50);
    let data = batch_data(50)
        .with_malformed("1017", Criterion::OrphaGene)
        .into_reference_data();

    let outcome = BatchRanker::new(data, &config).rank(&diseases).unwrap();

    assert_eq!(outcome.ranked.len(), 49);
    let ranks: Vec<u32> = outcome.ranked.iter().filter_map(|s| s.rank()).collect();
    assert_eq!(ranks, (1..=49).collect::<Vec<u32>>());
    assert!(outcome.ranked.iter().all(|s| s.orpha_code != "1017"));
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].orpha_code, "1017");

    for pair in outcome.ranked.windows(2) {
        assert!(pair[0].weighted_score() >= pair[1].weighted_score());
    }
    for score in &outcome.ranked {
        for (_, value) in score.criteria_scores().iter() {
            assert!((0.0..=10.0).contains(&value));
        }
    }
}

#[test]
fn test_parallel_and_sequential_agree() {
    let config = sample_config();
    let diseases = disease_batch(80);
    let data = batch_data(80).into_reference_data();

    let sequential = BatchRanker::new(data.clone(), &config)
        .with_parallel_threshold(0)
        .rank(&diseases)
        .unwrap();
    let parallel = BatchRanker::new(data, &config)
        .with_parallel_threshold(8)
        .rank(&diseases)
        .unwrap();

    assert_eq!(sequential.ranked, parallel.ranked);
    let unique: HashSet<&str> = sequential.ranked.iter().map(|s| s.orpha_code.as_str()).collect();
    assert_eq!(unique.len(), 80);
}

#[test]
fn test_ranking_from_curated_tables() {
    let curated = CuratedDataDir::new().with_sample_tables();
    let data = CuratedDataAdapter::open(curated.path()).unwrap().into_reference_data();
    let outcome = BatchRanker::new(data, &sample_config())
        .rank(&sample_diseases())
        .unwrap();

    assert!(outcome.failures.is_empty());
    let order: Vec<&str> = outcome.ranked.iter().map(|s| s.orpha_code.as_str()).collect();
    // 558: 0.8+1.2+2.0+0+1.0+0.5 = 5.5
    // 586: 1.2+2.0+1.66+0.015+1.0+0 = 5.875
    // 166: 1.2+0+2.0+0.015+1.0+1.5 = 5.715
    assert_eq!(order, vec!["586", "166", "558"]);

    let cf = &outcome.ranked[0];
    assert!((cf.weighted_score() - 5.875).abs() < 1e-9);
    assert!(cf.justifications.orpha_drugs.contains("Kalydeco"));
    assert!(cf.justifications.socioeconomic.contains("Alto coste"));
    assert!(cf.justifications.orpha_gene.contains("CFTR"));
}
