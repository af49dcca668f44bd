use spacemix_core::{
    aggregate_all, aggregate_project, distinct_space_types, AggregateError, ProjectPartitions,
    SpaceRow,
};

#[test]
fn example_project_buckets_and_totals() {
    let partitions = ProjectPartitions::from_rows(example_rows()).unwrap();
    let aggregates = aggregate_all(&partitions).unwrap();

    let a = aggregates.get("A").unwrap();
    assert_eq!(a.space_types(), vec!["WORK", "MEET"]);
    assert_eq!(a.area_sums(), vec![100.0, 50.0]);
    assert_eq!(a.total_area, 150.0);
    assert_eq!(a.desk_count, 4);
    assert_eq!(a.room_count, 2);

    let b = aggregates.get("B").unwrap();
    assert_eq!(b.total_area, 200.0);
    assert_eq!(aggregates.total_areas(), vec![150.0, 200.0]);
}

#[test]
fn duplicate_space_types_share_one_bucket_at_first_position() {
    let rows = vec![
        SpaceRow::new("A", "MEET", 20.0, 0),
        SpaceRow::new("A", "WORK", 100.0, 6),
        SpaceRow::new("A", "MEET", 30.0, 0),
        SpaceRow::new("A", "AMENITY", 5.0, 0),
        SpaceRow::new("A", "WORK", 1.5, 1),
    ];

    let aggregate = aggregate_project("A", &rows).unwrap();

    assert_eq!(aggregate.space_types(), vec!["MEET", "WORK", "AMENITY"]);
    assert_eq!(aggregate.area_sums(), vec![50.0, 101.5, 5.0]);
    assert_eq!(aggregate.area_for("WORK"), Some(101.5));
    assert_eq!(aggregate.area_for("STORAGE"), None);
    assert_eq!(aggregate.desk_count, 7);
}

#[test]
fn space_type_match_is_exact() {
    let rows = vec![
        SpaceRow::new("A", "WORK", 10.0, 0),
        SpaceRow::new("A", "work", 10.0, 0),
        SpaceRow::new("A", "WORK ", 10.0, 0),
    ];

    let aggregate = aggregate_project("A", &rows).unwrap();
    assert_eq!(aggregate.buckets.len(), 3);
}

#[test]
fn non_positive_areas_are_summed_as_is() {
    let rows = vec![
        SpaceRow::new("A", "WORK", 10.0, 0),
        SpaceRow::new("A", "WORK", -4.0, 0),
        SpaceRow::new("A", "MEET", 0.0, 0),
    ];

    let aggregate = aggregate_project("A", &rows).unwrap();
    assert_eq!(aggregate.area_sums(), vec![6.0, 0.0]);
    assert_eq!(aggregate.total_area, 6.0);
}

#[test]
fn empty_partition_is_refused() {
    let err = aggregate_project("Ghost", &[]).unwrap_err();
    assert_eq!(err, AggregateError::EmptyPartition("Ghost".to_string()));
}

#[test]
fn distinct_space_types_is_idempotent() {
    let rows = generated_rows(300);

    let first = distinct_space_types(&rows);
    let second = distinct_space_types(&rows);

    assert_eq!(first, second);
    let mut deduped = first.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), first.len());
}

#[test]
fn bucket_sums_match_total_area_for_every_project() {
    let partitions = ProjectPartitions::from_rows(generated_rows(500)).unwrap();
    let aggregates = aggregate_all(&partitions).unwrap();

    assert_eq!(aggregates.len(), partitions.len());
    for aggregate in aggregates.iter() {
        let bucket_sum: f64 = aggregate.area_sums().iter().sum();
        let tolerance = 1e-9 * aggregate.total_area.abs().max(1.0);
        assert!(
            (bucket_sum - aggregate.total_area).abs() <= tolerance,
            "project {} buckets {bucket_sum} total {}",
            aggregate.project,
            aggregate.total_area
        );
        let rows = partitions.rows(&aggregate.project).unwrap();
        assert_eq!(aggregate.space_types(), distinct_space_types(rows));
    }
}

#[test]
fn lookup_by_project_name_returns_the_partition_order_entry() {
    let partitions = ProjectPartitions::from_rows(generated_rows(500)).unwrap();
    let aggregates = aggregate_all(&partitions).unwrap();

    for (partition, aggregate) in partitions.iter().zip(aggregates.iter()) {
        let found = aggregates.get(&partition.project).unwrap();
        assert!(std::ptr::eq(found, aggregate));
    }
    assert!(aggregates.get("missing").is_none());

    let json = serde_json::to_value(&aggregates).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 1);
    assert_eq!(
        json["aggregates"].as_array().unwrap().len(),
        partitions.len()
    );
}

#[test]
fn aggregates_serialize_with_bucket_fields() {
    let aggregate = aggregate_project("A", &example_rows()[..2]).unwrap();

    let json = serde_json::to_value(&aggregate).unwrap();
    assert_eq!(json["project"], "A");
    assert_eq!(json["buckets"][0]["space_type"], "WORK");
    assert_eq!(json["buckets"][1]["area"], 50.0);
    assert_eq!(json["total_area"], 150.0);
}

fn example_rows() -> Vec<SpaceRow> {
    vec![
        SpaceRow::new("A", "WORK", 100.0, 4),
        SpaceRow::new("A", "MEET", 50.0, 0),
        SpaceRow::new("B", "WORK", 200.0, 8),
    ]
}

fn generated_rows(count: usize) -> Vec<SpaceRow> {
    let mut seed: u64 = 0xa5ea;
    (0..count)
        .map(|_| {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let project = format!("P{}", (seed >> 33) % 9);
            let space_type =
                ["WORK", "MEET", "AMENITY", "SUPPORT", "CIRCULATION"][((seed >> 20) % 5) as usize];
            let area = ((seed >> 40) % 100_000) as f64 / 13.0 + 0.25;
            SpaceRow::new(project, space_type, area, ((seed >> 12) % 50) as u32)
        })
        .collect()
}
