use scriptlint::cli;
use scriptlint::linters::LinterKind;

fn main() {
    let args = cli::parse_args("pwshlint", "Lint PowerShell scripts with PSScriptAnalyzer");
    std::process::exit(cli::execute(LinterKind::Pwsh, args));
}
