use super::*;

#[test]
fn first_token_per_line_and_comments_skipped() {
    let list = parse_file_list(
        "# faces\nposx.png trailing words\n\n  negx.png\n#negy.png\nposy.hdr\n",
    )
    .unwrap();
    assert_eq!(
        list,
        vec![
            PathBuf::from("posx.png"),
            PathBuf::from("negx.png"),
            PathBuf::from("posy.hdr"),
        ]
    );
}

#[test]
fn options_and_wildcards_are_rejected() {
    assert!(matches!(
        parse_file_list("a.png\n-y\n").unwrap_err(),
        EnvmapError::Input(_)
    ));
    assert!(matches!(
        parse_file_list("faces/*.png\n").unwrap_err(),
        EnvmapError::Input(_)
    ));
}

#[test]
fn missing_list_file_is_an_input_error() {
    let err = read_file_list(Path::new("/definitely/not/here.txt")).unwrap_err();
    assert!(err.to_string().contains("-flist"));
}
