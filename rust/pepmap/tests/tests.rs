use pepmap::data_sources::{
    parse_reference_fasta,
    PeptideTable,
};
use pepmap::{
    LayoutConfig,
    LayoutEngine,
    OccurrenceIndex,
    PeptideRecord,
    ProteinSet,
    ReferenceSequence,
    ReportBuilder,
    ReportView,
};
use std::collections::BTreeMap;

/// Small deterministic residue generator, no need for real randomness here.
fn pseudo_protein(len: usize, seed: u64) -> String {
    const ALPHABET: &[u8] = b"ACDE";
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ALPHABET[((state >> 33) % ALPHABET.len() as u64) as usize] as char
        })
        .collect()
}

fn build_index(reference: &str, peptides: &[(&str, &str, &str)]) -> OccurrenceIndex {
    let records = peptides
        .iter()
        .map(|(s, p, e)| PeptideRecord::new(s, ProteinSet::from_field(p), e).unwrap())
        .collect();
    OccurrenceIndex::build(ReferenceSequence::new(reference).unwrap(), records).unwrap()
}

fn sampled_peptides(reference: &str) -> Vec<String> {
    // Mix of short, repeated and longer-than-a-line peptides.
    [(0, 3), (4, 2), (7, 9), (10, 4), (20, 17), (33, 5), (50, 2), (61, 12)]
        .iter()
        .filter(|(s, l)| s + l <= reference.len())
        .map(|(s, l)| reference[*s..s + l].to_string())
        .collect()
}

#[test]
fn test_lines_reconstruct_reference() {
    let reference = pseudo_protein(97, 7);
    let peptides = sampled_peptides(&reference);
    let rows: Vec<_> = peptides.iter().map(|p| (p.as_str(), "P1", "E1")).collect();
    let index = build_index(&reference, &rows);
    let occurrences = index.all_occurrences();

    for width in 1..=25 {
        let config = LayoutConfig::new(width, 1.0).unwrap();
        let lines = LayoutEngine::new(index.reference(), config)
            .layout(&occurrences)
            .unwrap();
        let text: String = lines.iter().map(|l| l.protein_text).collect();
        assert_eq!(text, reference, "width {}", width);
        assert_eq!(lines.len(), reference.len().div_ceil(width));
        for (k, line) in lines.iter().enumerate() {
            assert_eq!(line.protein_offset, k * width);
        }
    }
}

#[test]
fn test_overlapping_spans_never_share_a_slot() {
    let reference = pseudo_protein(120, 11);
    let peptides = sampled_peptides(&reference);
    let rows: Vec<_> = peptides.iter().map(|p| (p.as_str(), "P1", "E1")).collect();
    let index = build_index(&reference, &rows);
    let occurrences = index.all_occurrences();

    for width in [3, 5, 8, 13, 40] {
        let config = LayoutConfig::new(width, 2.0).unwrap();
        let lines = LayoutEngine::new(index.reference(), config)
            .layout(&occurrences)
            .unwrap();
        for line in &lines {
            for (i, a) in line.spans.iter().enumerate() {
                assert!(a.vertical_slot >= line.floor);
                for b in &line.spans[i + 1..] {
                    let overlap =
                        a.start_in_line < b.end_in_line() && b.start_in_line < a.end_in_line();
                    if overlap {
                        assert_ne!(a.vertical_slot, b.vertical_slot, "width {}", width);
                    }
                }
            }
        }
        // Every line's text is drawn below the annotations of the previous one.
        for pair in lines.windows(2) {
            assert!(pair[1].text_top > pair[0].bottom());
        }
    }
}

#[test]
fn test_every_occurrence_forms_one_chain() {
    let reference = pseudo_protein(90, 3);
    let peptides = sampled_peptides(&reference);
    let rows: Vec<_> = peptides.iter().map(|p| (p.as_str(), "P1", "E1")).collect();
    let index = build_index(&reference, &rows);
    let occurrences = index.all_occurrences();

    for width in [4, 6, 10] {
        let config = LayoutConfig::new(width, 1.0).unwrap();
        let lines = LayoutEngine::new(index.reference(), config)
            .layout(&occurrences)
            .unwrap();

        let mut chains: BTreeMap<(usize, usize), Vec<_>> = BTreeMap::new();
        for span in lines.iter().flat_map(|l| l.spans.iter()) {
            chains
                .entry((span.occurrence_start, span.occurrence_end))
                .or_default()
                .push(span);
        }

        let mut expected: Vec<_> = occurrences.iter().map(|o| (o.start(), o.end())).collect();
        expected.sort_unstable();
        expected.dedup();
        assert_eq!(chains.keys().copied().collect::<Vec<_>>(), expected);

        for ((start, end), spans) in chains {
            let text: String = spans
                .iter()
                .map(|s| index.reference().slice(s.segment_range(width)))
                .collect();
            assert_eq!(text, &reference[start..end]);
            assert!(!spans[0].is_continuation);
            for (prev, next) in spans.iter().zip(spans.iter().skip(1)) {
                assert!(next.is_continuation);
                assert_eq!(next.start_in_line, 0);
                assert_eq!(next.line_index, prev.line_index + 1);
                assert_eq!(prev.end_in_line(), width);
            }
            if start / width + 1 == (end - 1) / width {
                assert_eq!(spans.len(), 2);
            }
        }
    }
}

#[test]
fn test_frequency_totals_match_record_occurrences() {
    let index = build_index(
        "AAAABAAAA",
        &[
            ("AA", "P1", "E1"),
            ("AA", "P2", "E2"),
            ("AAB", "P1", "E1"),
            ("ZZ", "P1", "E1"),
        ],
    );
    let freq = index.frequencies();
    assert_eq!(freq.get("AA"), Some(12));
    assert_eq!(freq.get("AAB"), Some(1));
    assert_eq!(freq.get("ZZ"), None);
    let per_record: usize = (0..index.records().len())
        .map(|i| index.occurrences_of(pepmap::RecordId(i)).len())
        .sum();
    assert_eq!(freq.total(), per_record);
}

#[test]
fn test_pipeline_from_text_inputs() {
    let fasta = ">sp|TEST|Demo\nABCAB\nCABCABC\n";
    let table = "Sequence\tProteins\tExperiment\nCAB\tP1\tE1\nCAB\tP1\tE1\n\tP3\tE2\n";

    let reference = parse_reference_fasta(fasta.as_bytes()).unwrap();
    let peptides = PeptideTable::from_reader(table.as_bytes(), b'\t').unwrap();
    assert_eq!(peptides.skipped.len(), 1);

    let index = OccurrenceIndex::build(reference, peptides.records).unwrap();
    let builder = ReportBuilder::new(&index, LayoutConfig::new(5, 20.0).unwrap());
    let report = builder.build_view(&ReportView::all()).unwrap();

    let starts: Vec<_> = report
        .lines
        .iter()
        .flat_map(|l| l.spans.iter())
        .filter(|s| !s.is_continuation)
        .map(|s| s.occurrence_start)
        .collect();
    assert_eq!(starts, vec![2, 5, 8]);

    let first = &report.lines[0].spans[0];
    // Both rows name P1 only, so the peptide is unique.
    assert!(first.underline);
    assert_eq!(first.tooltip.amount, 6);
    assert_eq!(first.records.len(), 2);
    assert_eq!(first.top, report.lines[0].floor);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["view"]["kind"], "group");
    assert_eq!(json["lines"][2]["spans"][0]["text"], "B");
}
