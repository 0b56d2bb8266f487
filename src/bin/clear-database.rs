use athlete_etl::config::Config;
use athlete_etl::constants;
use athlete_etl::db;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config_path = std::env::var("ETL_CONFIG")
        .unwrap_or_else(|_| constants::DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)?;
    let db_path = config.database.path;

    println!("⚠️  WARNING: This will delete ALL data from {}!", db_path.display());
    println!("Press Enter to continue or Ctrl+C to cancel...");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    println!("🗑️  Clearing database...");
    let deleted = db::with_sink(&db_path, |sink| {
        sink.create_schema()?;
        sink.delete_table_data(&[])
    })?;

    println!("✅ Database cleared successfully! ({} rows deleted)", deleted);
    Ok(())
}
