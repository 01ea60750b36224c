use std::collections::BTreeMap;
use tvgrep::filter::{ChannelNameIndex, CompileOptions, Diagnostics, FilterEngine, compile};
use tvgrep::{Channel, FieldValue, Listings, Programme, read_listings, write_listings};

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn programme(
    channel: &str,
    title: &str,
    start: &str,
    stop: &str,
    clumpidx: Option<&str>,
) -> Programme {
    let mut fields = BTreeMap::new();
    fields.insert("title".to_string(), vec![FieldValue::new(title)]);
    Programme {
        channel: channel.to_string(),
        start: start.to_string(),
        stop: Some(stop.to_string()),
        clumpidx: clumpidx.map(|s| s.parse().unwrap()),
        fields,
    }
}

/// Two channels, one clumped timeslot on the sports channel.
fn sample_listings() -> Listings {
    Listings {
        encoding: Some("UTF-8".to_string()),
        credits: serde_json::json!({"generator-info-name": "sample"}),
        channels: vec![
            Channel {
                id: "a".to_string(),
                display_names: vec![FieldValue::new("News24")],
            },
            Channel {
                id: "b".to_string(),
                display_names: vec![FieldValue::new("SportsMax")],
            },
        ],
        programmes: vec![
            programme(
                "a",
                "Headlines",
                "20260101090000",
                "20260101093000",
                None,
            ),
            programme(
                "b",
                "Match Report",
                "20260101090000",
                "20260101100000",
                Some("0/2"),
            ),
            programme(
                "b",
                "Highlights",
                "20260101090000",
                "20260101100000",
                Some("1/2"),
            ),
        ],
    }
}

fn run_filter(expression: &[&str], input: Listings) -> Listings {
    let plan = compile(&tokens(expression), &CompileOptions::default()).unwrap();
    let index = ChannelNameIndex::build(plan.channel_name_patterns(), &input.channels).unwrap();
    let mut diagnostics = Diagnostics::new();
    FilterEngine::new(&plan, &index).apply(input, &mut diagnostics)
}

#[test]
fn test_channel_and_title_filter_with_clump_repair() {
    let output = run_filter(
        &["--channel-name", "SportsMax", "--and", "--title", "Highlights"],
        sample_listings(),
    );

    // channel-name restricts the channel domain to the sports channel
    let ids: Vec<&str> = output.channels.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);

    // only the matching programme survives, and losing its clump sibling
    // strips the clump marking from the sole survivor
    assert_eq!(output.programmes.len(), 1);
    let survivor = &output.programmes[0];
    assert_eq!(survivor.occurrences("title"), vec!["Highlights"]);
    assert_eq!(survivor.clumpidx, None);

    // encoding and credits pass through untouched
    assert_eq!(output.encoding.as_deref(), Some("UTF-8"));
    assert_eq!(
        output.credits,
        serde_json::json!({"generator-info-name": "sample"})
    );
}

#[test]
fn test_document_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("listings.json");
    let output_path = dir.path().join("filtered.json");

    write_listings(&sample_listings(), Some(&input_path)).unwrap();
    let input = read_listings(Some(&input_path)).unwrap();

    let output = run_filter(&["--channel-name", "Sports"], input);
    write_listings(&output, Some(&output_path)).unwrap();

    let reloaded = read_listings(Some(&output_path)).unwrap();
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        serde_json::to_value(&reloaded).unwrap()
    );
    assert_eq!(reloaded.channels.len(), 1);
    assert_eq!(reloaded.programmes.len(), 2);
}

#[test]
fn test_unwritable_destination_is_a_write_error() {
    // a directory cannot be opened as an output file
    let dir = tempfile::tempdir().unwrap();
    let err = write_listings(&sample_listings(), Some(dir.path())).unwrap_err();
    assert!(err.to_string().contains("Failed to write listings"));
    assert!(err.to_string().contains(&dir.path().display().to_string()));
}

#[test]
fn test_missing_input_file_is_a_read_error() {
    let err = read_listings(Some(std::path::Path::new("/nonexistent/listings.json")))
        .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/listings.json"));
}
