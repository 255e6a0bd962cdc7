use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use naija_recipes::model::parse_filter;
use naija_recipes::{
    open_saved_recipes, parse_share_link, recipe_markdown, recipe_text, share_link, AppConfig,
    FileStorage, GeneratedRecipe, ImageReference, KitchenSession, RecipeOrchestrator,
    RecipeRequest,
};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "naija-recipes")]
#[command(about = "Generate Nigerian recipes with AI and keep your favourites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a recipe for a named dish (or a surprise when no query is given)
    Generate {
        /// Dish to cook, e.g. "Egusi Soup"
        #[arg(short, long, default_value = "")]
        query: String,
        #[command(flatten)]
        filters: Filters,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Let the model pick a popular dish
    Surprise {
        #[command(flatten)]
        filters: Filters,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List saved recipes
    Saved {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Delete a saved recipe by its exact name
    Delete { name: String },
    /// Print a link that reproduces a search
    Share {
        #[arg(short, long, default_value = "")]
        query: String,
        #[command(flatten)]
        filters: Filters,
    },
    /// Generate from a previously shared link
    Open {
        link: String,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct Filters {
    /// Regional cuisine (Yoruba, Igbo, Hausa, Efik, Edo, Ijaw) or Any
    #[arg(long, default_value = "Any")]
    cuisine: String,
    /// Meal type (Breakfast, Lunch, Dinner, Snack, Dessert, Drink) or Any
    #[arg(long, default_value = "Any")]
    meal: String,
}

impl Filters {
    fn to_request(&self, query: &str) -> Result<RecipeRequest, Box<dyn Error>> {
        Ok(RecipeRequest::named(query.trim())
            .with_cuisine(parse_filter(&self.cuisine)?)
            .with_meal_type(parse_filter(&self.meal)?))
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Save the generated recipe to the local collection
    #[arg(long)]
    save: bool,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Write a generated image to this file
    #[arg(long)]
    image_out: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Markdown,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Commands::Generate {
            query,
            filters,
            output,
        } => {
            let request = filters.to_request(&query)?;
            generate(&config, request, &output).await?;
        }
        Commands::Surprise { filters, output } => {
            let request = filters.to_request("")?;
            generate(&config, request, &output).await?;
        }
        Commands::Open { link, output } => {
            let request = parse_share_link(&link)?;
            generate(&config, request, &output).await?;
        }
        Commands::Saved { format } => {
            let store = open_saved_recipes(&config)?;
            if store.recipes().is_empty() {
                println!("No saved recipes yet.");
            }
            for saved in store.recipes() {
                match format {
                    Format::Text => println!("{}", saved.name()),
                    Format::Markdown => {
                        println!("{}", recipe_markdown(&saved.recipe, Some(&saved.image_url)))
                    }
                    Format::Json => println!("{}", serde_json::to_string_pretty(saved)?),
                }
            }
        }
        Commands::Delete { name } => {
            let mut store = open_saved_recipes(&config)?;
            if !store.contains(&name) {
                warn!("No saved recipe named '{}'", name);
            }
            let remaining = store.delete(&name)?;
            println!("{} saved recipes remain.", remaining.len());
        }
        Commands::Share { query, filters } => {
            let request = filters.to_request(&query)?;
            println!("{}", share_link(&config.share_base_url, &request)?);
        }
    }

    Ok(())
}

async fn generate(
    config: &AppConfig,
    request: RecipeRequest,
    output: &OutputArgs,
) -> Result<(), Box<dyn Error>> {
    let orchestrator = RecipeOrchestrator::from_config(config)?;
    let storage = FileStorage::from_config(&config.storage)?;
    let mut session = KitchenSession::new(orchestrator, storage);

    let generated = session.generate(request).await?.clone();
    print_recipe(&generated, output.format)?;

    if let Some(path) = &output.image_out {
        match &generated.image {
            ImageReference::Inline(image) => {
                tokio::fs::write(path, &image.bytes).await?;
                info!("Wrote image to {}", path.display());
            }
            ImageReference::Remote(url) => {
                warn!("No generated image to write; stock photo is at {}", url);
            }
        }
    }

    if output.save {
        if session.is_current_saved() {
            println!("'{}' is already saved.", generated.recipe.name);
        } else {
            session.save_current()?;
            println!("Saved '{}'.", generated.recipe.name);
        }
    }

    println!(
        "Share: {}",
        share_link(&config.share_base_url, session.request())?
    );

    Ok(())
}

fn print_recipe(generated: &GeneratedRecipe, format: Format) -> Result<(), Box<dyn Error>> {
    let image_url = generated.image.as_url();
    match format {
        Format::Text => {
            println!("{}", recipe_text(&generated.recipe));
            if generated.image.is_fallback() {
                println!("Image: {}", image_url);
            }
        }
        Format::Markdown => println!("{}", recipe_markdown(&generated.recipe, Some(&image_url))),
        Format::Json => println!("{}", serde_json::to_string_pretty(&generated.to_saved())?),
    }
    Ok(())
}
