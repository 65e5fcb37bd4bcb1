use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter payload and print the resulting SQL
    Compile {
        #[arg(long, help = "Entity schema file path")]
        schema: String,

        #[arg(long, help = "Entity to filter")]
        entity: String,

        #[arg(long, help = "JSON filter payload: one clause or a list of clauses")]
        filter: String,

        #[arg(
            long,
            default_value = "postgres",
            help = "SQL dialect: \"postgres\" or \"mysql\""
        )]
        dialect: String,

        #[arg(long, help = "If set, prints SQL, parameters and skipped clauses as JSON")]
        json: bool,
    },
    /// Apply a filter payload to rows read from a JSON file
    Apply {
        #[arg(long, help = "Entity schema file path")]
        schema: String,

        #[arg(long, help = "Entity to filter")]
        entity: String,

        #[arg(long, help = "JSON filter payload: one clause or a list of clauses")]
        filter: String,

        #[arg(long, help = "File holding a JSON array of row objects")]
        rows: String,
    },
    /// List the attributes an entity can be filtered on
    Attributes {
        #[arg(long, help = "Entity schema file path")]
        schema: String,

        #[arg(long, help = "Entity to inspect")]
        entity: String,
    },
}
