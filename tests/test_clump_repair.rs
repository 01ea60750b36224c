use std::collections::BTreeMap;
use tvgrep::filter::{ChannelNameIndex, CompileOptions, Diagnostics, FilterEngine, compile};
use tvgrep::{Channel, ClumpIdx, FieldValue, Listings, Programme};

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn programme(channel: &str, title: &str, start: &str, clumpidx: Option<&str>) -> Programme {
    let mut fields = BTreeMap::new();
    fields.insert("title".to_string(), vec![FieldValue::new(title)]);
    Programme {
        channel: channel.to_string(),
        start: start.to_string(),
        stop: Some("20260101100000".to_string()),
        clumpidx: clumpidx.map(|s| s.parse().unwrap()),
        fields,
    }
}

fn listings(programmes: Vec<Programme>) -> Listings {
    Listings {
        encoding: None,
        credits: serde_json::Value::Null,
        channels: vec![Channel {
            id: "b".to_string(),
            display_names: vec![FieldValue::new("SportsMax")],
        }],
        programmes,
    }
}

fn run_filter(expression: &[&str], input: Listings) -> Listings {
    let plan = compile(&tokens(expression), &CompileOptions::default()).unwrap();
    let index = ChannelNameIndex::build(plan.channel_name_patterns(), &input.channels).unwrap();
    let mut diagnostics = Diagnostics::new();
    FilterEngine::new(&plan, &index).apply(input, &mut diagnostics)
}

fn clump(s: &str) -> Option<ClumpIdx> {
    Some(s.parse().unwrap())
}

#[test]
fn test_survivors_are_renumbered_contiguously() {
    // Four-way clump, two members dropped: survivors renumber to 0/2, 1/2 in
    // their original relative order.
    let input = listings(vec![
        programme("b", "Keep One", "20260101090000", Some("0/4")),
        programme("b", "Drop One", "20260101090000", Some("1/4")),
        programme("b", "Keep Two", "20260101090000", Some("2/4")),
        programme("b", "Drop Two", "20260101090000", Some("3/4")),
    ]);

    let output = run_filter(&["--title", "Keep"], input);
    assert_eq!(output.programmes.len(), 2);
    assert_eq!(output.programmes[0].occurrences("title"), vec!["Keep One"]);
    assert_eq!(output.programmes[0].clumpidx, clump("0/2"));
    assert_eq!(output.programmes[1].occurrences("title"), vec!["Keep Two"]);
    assert_eq!(output.programmes[1].clumpidx, clump("1/2"));
}

#[test]
fn test_sole_survivor_is_unmarked() {
    let input = listings(vec![
        programme("b", "Match Report", "20260101090000", Some("0/2")),
        programme("b", "Highlights", "20260101090000", Some("1/2")),
    ]);

    let output = run_filter(&["--title", "Highlights"], input);
    assert_eq!(output.programmes.len(), 1);
    assert_eq!(output.programmes[0].clumpidx, None);
}

#[test]
fn test_fully_surviving_clump_is_untouched() {
    let input = listings(vec![
        programme("b", "Match Report", "20260101090000", Some("0/2")),
        programme("b", "Highlights", "20260101090000", Some("1/2")),
        programme("b", "Late Film", "20260101220000", None),
    ]);

    let output = run_filter(&["--not", "--title", "Film"], input);
    assert_eq!(output.programmes.len(), 2);
    assert_eq!(output.programmes[0].clumpidx, clump("0/2"));
    assert_eq!(output.programmes[1].clumpidx, clump("1/2"));
}

#[test]
fn test_groups_are_keyed_by_channel_and_start() {
    // Same start time on two channels: independent groups.
    let mut input = listings(vec![
        programme("b", "Keep", "20260101090000", Some("0/2")),
        programme("b", "Drop", "20260101090000", Some("1/2")),
        programme("c", "Keep Too", "20260101090000", Some("0/2")),
        programme("c", "Keep Also", "20260101090000", Some("1/2")),
    ]);
    input.channels.push(Channel {
        id: "c".to_string(),
        display_names: vec![FieldValue::new("News24")],
    });

    let output = run_filter(&["--title", "Keep"], input);
    assert_eq!(output.programmes.len(), 3);
    // channel b's clump collapsed to a singleton
    assert_eq!(output.programmes[0].clumpidx, None);
    // channel c's clump survived whole and keeps its numbering
    assert_eq!(output.programmes[1].clumpidx, clump("0/2"));
    assert_eq!(output.programmes[2].clumpidx, clump("1/2"));
}

#[test]
fn test_second_pass_over_repaired_output_is_a_no_op() {
    // Filtering is not idempotent relative to the input (renumbering mutates
    // kept records), but it converges: repairing once is enough.
    let input = listings(vec![
        programme("b", "Keep One", "20260101090000", Some("0/3")),
        programme("b", "Drop", "20260101090000", Some("1/3")),
        programme("b", "Keep Two", "20260101090000", Some("2/3")),
    ]);

    let first = run_filter(&["--title", "Keep"], input);
    let second = run_filter(&["--title", "Keep"], first.clone());

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}
