use gdu_core::CMD_TOOL_SCRIPT;

pub fn build_args<S: AsRef<str>>(reference_paths: &[S]) -> Vec<String> {
    let mut args = vec![
        "--headless".to_string(),
        "-s".to_string(),
        "-d".to_string(),
        CMD_TOOL_SCRIPT.to_string(),
    ];
    for path in reference_paths {
        args.push("-a".to_string());
        args.push(path.as_ref().to_string());
    }
    args.push("--ignoreHeadlessMode".to_string());
    args.push("-c".to_string());
    args
}
