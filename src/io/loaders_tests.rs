use super::loaders::MeterDataLoader;

#[test]
fn load_from_str_parses_a_table() {
    let csv = "\
timestamp,mains_kw
2023-06-01 00:00:00,1.0
2023-06-01 00:30:00,2.0
";
    let table = MeterDataLoader::load_from_str(csv).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.columns.len(), 1);
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = MeterDataLoader::load_from_file(std::path::Path::new("data.xlsx")).unwrap_err();
    assert!(err.to_string().contains("Unsupported file format"));
}

#[test]
fn missing_extension_is_rejected() {
    let err = MeterDataLoader::load_from_file(std::path::Path::new("data")).unwrap_err();
    assert!(err.to_string().contains("no extension"));
}
