use clap::Parser;
use miette::Result;
use relief::cli::commands::{completions, dis, don, init, link, party, prd, total};
use relief::cli::helpers::{discover_project, Session};
use relief::cli::{Cli, Commands};
use relief::core::config::{Config, SkippedConfig};
use relief::core::logging::init_tracing;
use relief::entities::{Beneficiary, Donor};

fn main() -> Result<()> {
    // Terminate quietly on a closed pipe (`relief dis list | head`)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    // Config is read once, before logging exists; report skipped files after
    let project = discover_project(&global);
    let (config, skipped) = Config::load_collecting(project.as_ref().ok());
    init_tracing(config.log.as_deref(), global.verbose);
    skipped.iter().for_each(SkippedConfig::report);

    let session = move || -> Result<Session> { Session::open(project?, config) };

    match cli.command {
        Commands::Init(args) => init::run(args),
        Commands::Dis(cmd) => dis::run(cmd, session()?, &global),
        Commands::Ben(cmd) => party::run::<Beneficiary>(cmd, session()?, &global),
        Commands::Dnr(cmd) => party::run::<Donor>(cmd, session()?, &global),
        Commands::Prd(cmd) => prd::run(cmd, session()?, &global),
        Commands::Don(cmd) => don::run(cmd, session()?, &global),
        Commands::Link(cmd) => link::run(cmd, session()?, &global),
        Commands::Total(cmd) => total::run(cmd, session()?, &global),
        Commands::Completions(args) => completions::run(args),
    }
}
