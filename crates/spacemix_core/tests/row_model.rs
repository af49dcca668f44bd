use spacemix_core::{RowValidationError, SpaceRow};

#[test]
fn new_row_has_empty_labels() {
    let row = SpaceRow::new("10 Alpha St", "WORK", 120.5, 6);

    assert_eq!(row.project, "10 Alpha St");
    assert_eq!(row.space_type, "WORK");
    assert_eq!(row.area, 120.5);
    assert_eq!(row.desk_count, 6);
    assert!(row.floor.is_empty());
    assert!(row.room.is_empty());
    assert!(row.room_number.is_empty());
    assert!(row.validate().is_ok());
}

#[test]
fn blank_project_fails_validation() {
    let row = SpaceRow::new("  ", "WORK", 1.0, 0);

    let err = row.validate().unwrap_err();
    assert_eq!(
        err,
        RowValidationError::EmptyProject {
            room_number: String::new()
        }
    );
    assert_eq!(err.to_string(), "row has an empty project");
}

#[test]
fn row_serialization_uses_column_names() {
    let row = SpaceRow {
        floor: "Floor 1".to_string(),
        room: "Board Room".to_string(),
        room_number: "102".to_string(),
        ..SpaceRow::new("10 Alpha St", "MEET", 300.0, 0)
    };

    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["project"], "10 Alpha St");
    assert_eq!(json["space_type"], "MEET");
    assert_eq!(json["room_number"], "102");
    assert_eq!(json["area"], 300.0);
    assert_eq!(json["desk_count"], 0);

    let decoded: SpaceRow = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, row);
}
