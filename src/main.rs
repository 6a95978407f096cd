use clap::Parser;
use color_eyre::Result;
use memopad::{
    cli::{self, Cli, Commands},
    App, Config, Database, Profile,
};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;
    env_logger::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // Load configuration with the determined profile
    let config = Config::load_with_profile(profile)?;

    // Initialize database
    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;

    // The session seeds the store on first run and loads the memo list
    let mut app = App::new(db);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Add {
            title,
            content,
            category,
            tags,
        } => cli::handle_add(title, content, category, tags, &mut app)?,
        Commands::List { category, search } => cli::handle_list(category, search, &mut app)?,
        Commands::Show { id } => cli::handle_show(id, &app)?,
        Commands::Edit {
            id,
            title,
            content,
            category,
            tags,
        } => cli::handle_edit(id, title, content, category, tags, &mut app)?,
        Commands::Delete { id } => cli::handle_delete(id, &mut app)?,
        Commands::Clear { yes } => cli::handle_clear(yes, &mut app)?,
        Commands::Stats => cli::handle_stats(&app)?,
        Commands::Summarize { id } => cli::handle_summarize(id, &app, &config)?,
    }

    Ok(())
}
