use numeral_coder::analysis::analyzer::ErrorAnalyzer;
use numeral_coder::analysis::table::Table;
use numeral_coder::config::parse_config;
use numeral_coder::output_io::save_results;
use pretty_assertions::assert_eq;
use std::fs;

const RAW_DATA: &str = "\
Subject,Block,Condition,ItemNum,target,response,NWordsPerTarget,manual
12AB,1,A,1,1002,1000 / 2,2,
12AB,1,A,2,23/560,560/23,4,
12AB,1,B,3,2,3,1,
12AB,1,B,4,1000,-,1,
12AB,1,B,5,2x,2,1,
";

#[test]
fn test_csv_in_csv_out() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("SC3.csv");
    fs::write(&input, RAW_DATA).unwrap();

    let config = parse_config("subject_id_style = \"strip-suffix\"", "coder.toml").unwrap();
    let analyzer = ErrorAnalyzer::new(config).unwrap();
    let table = Table::from_csv_path(&input).unwrap();
    assert_eq!(table.name, "SC3");

    let result = analyzer.run(&[table]).unwrap();
    assert_eq!(result.n_failed, 1);
    assert_eq!(result.rows.len(), 4);

    let out_dir = dir.path().join("out");
    let paths = save_results(&result, &out_dir, "data_coded").unwrap();

    let coded = fs::read_to_string(&paths.coded).unwrap();
    let lines: Vec<&str> = coded.lines().collect();
    assert_eq!(
        lines[0],
        "Subject,Block,Condition,ItemNum,target,response,NWordsPerTarget,exclude,manual,\
         NTargetDigits,NMissingWords,PMissingWords,NMissingDigits,PMissingDigits,\
         NMissingClasses,PMissingClasses,PMissingMorphemes"
    );
    assert_eq!(lines[1], "12,1,A,1,1002,1000 / 2,2,,,1,0,0,0,0,0,0,0");
    assert_eq!(lines[3], "12,1,B,3,2,3,1,,,1,1,1,1,1,0,0,0.5");
    // "1000" has no digit-bearing word, so PMissingDigits is blank
    assert_eq!(lines[4], "12,1,B,4,1000,-,1,,,0,1,1,0,,1,1,1");

    let words = fs::read_to_string(&paths.words).unwrap();
    let words: Vec<&str> = words.lines().collect();
    assert_eq!(
        words[0],
        "subject,block,condition,item_num,n_target_words,target,response,word_order,\
         word_class,word_class_order,target_word,word_ok,digit_ok"
    );
    assert_eq!(words[1], "12,1,A,1,2,1002,1000 / 2,1,thousand,,thousand,1,");
    assert_eq!(words[2], "12,1,A,1,2,1002,1000 / 2,2,ones,0,ones:2,1,1");
    // 2 + 4 + 1 + 1 target words
    assert_eq!(words.len(), 1 + 8);

    let subjects = fs::read_to_string(&paths.subjects).unwrap();
    assert_eq!(subjects, "subject,n_excluded\nSC3,0\n");
}
