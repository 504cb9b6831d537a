use scriptlint::cli;
use scriptlint::linters::LinterKind;

fn main() {
    let args = cli::parse_args("shlint", "Lint shell scripts with ShellCheck");
    std::process::exit(cli::execute(LinterKind::ShellCheck, args));
}
