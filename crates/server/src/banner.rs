pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");

    let banner = format!(
        r#"
 ████████╗██████╗ ██╗██████╗  ██████╗
 ╚══██╔══╝██╔══██╗██║██╔══██╗██╔═══██╗    tripo-relay
    ██║   ██████╔╝██║██████╔╝██║   ██║    v{}
    ██║   ██╔══██╗██║██╔═══╝ ██║   ██║
    ██║   ██║  ██║██║██║     ╚██████╔╝
    ╚═╝   ╚═╝  ╚═╝╚═╝╚═╝      ╚═════╝
"#,
        version
    );

    tracing::info!("{}", banner);
}
