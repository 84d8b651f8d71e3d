use std::fs;

use taxogen::config::Settings;
use taxogen::diagnostics::CollectingSink;
use taxogen::generate;

/// The same flow the binary runs: parse a settings file from disk, then
/// generate from it.
#[test]
fn settings_file_drives_a_full_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("concepts.csv");
    let output = dir.path().join("out.xml");
    fs::write(&input, "group,term\ntools,hammer\n,saw\nmaterials,oak\n").unwrap();

    // Multi-line element template via tab continuation lines.
    let settings_text = format!(
        "# taxogen settings\n\
         inputFile\t{input}\n\
         outputFile\t{output}\n\
         firstRowAsColumnNames\ttrue\n\
         hierarchyColumns\t1,2\n\
         showNarrowerReference\t1\n\
         defaultElementTemplate\t<concept id=\"<id>\">\n\
         \t<relations></concept>\n\
         defaultNarrowerReferenceTemplate\t<narrower ref=\"<child>\"/>\n\
         defaultPropertyTemplate\t<prop><value></prop>\n",
        input = input.display(),
        output = output.display(),
    );
    let settings_path = dir.path().join("run.settings");
    fs::write(&settings_path, &settings_text).unwrap();

    let sink = CollectingSink::new();
    let settings = Settings::load(&settings_path, &sink).unwrap();
    generate(&settings, &sink).unwrap();

    assert!(sink.is_empty(), "unexpected diagnostics: {:?}", sink.collected());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "<concept id=\"tools\">\n\
         <narrower ref=\"hammer\"/>\n\
         <narrower ref=\"saw\"/>\n\
         </concept>\n\
         <concept id=\"materials\">\n\
         <narrower ref=\"oak\"/>\n\
         </concept>\n\
         <concept id=\"hammer\">\n\
         </concept>\n\
         <concept id=\"saw\">\n\
         </concept>\n\
         <concept id=\"oak\">\n\
         </concept>\n"
    );
}
