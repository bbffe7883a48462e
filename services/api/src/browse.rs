use crate::infra::load_catalog_source;
use clap::Args;
use estate_listings::analytics::MarketAnalytics;
use estate_listings::config::AppConfig;
use estate_listings::error::AppError;
use estate_listings::listings::{
    compute_visible_properties, FilterSpec, ListingServiceError, PriceRange, Property, SortKey,
    StatusFilter, TypeFilter,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct BrowseArgs {
    /// JSON catalog to browse instead of CATALOG_PATH or the bundled sample
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Case-insensitive text matched against title, location, and type
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Exact property type, e.g. "Condo"
    #[arg(long = "type")]
    pub(crate) property_type: Option<String>,
    /// "For Sale" or "For Rent"
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Lowest price to include; fractions round up to the next dollar
    #[arg(long)]
    pub(crate) min_price: Option<f64>,
    /// Highest price to include; 0 leaves the ceiling open
    #[arg(long)]
    pub(crate) max_price: Option<f64>,
    /// Minimum bedrooms
    #[arg(long)]
    pub(crate) bedrooms: Option<u32>,
    /// Minimum bathrooms
    #[arg(long)]
    pub(crate) bathrooms: Option<f32>,
    /// price-asc, price-desc, newest, oldest, area-desc, area-asc
    #[arg(long, default_value = "price-asc")]
    pub(crate) sort: SortKey,
    /// Emit the matching listings as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AnalyticsArgs {
    /// JSON catalog to analyze instead of CATALOG_PATH or the bundled sample
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

impl BrowseArgs {
    fn filter(&self) -> Result<FilterSpec, AppError> {
        let status = match self.status.as_deref() {
            None => StatusFilter::All,
            Some(raw) => StatusFilter::parse(raw).map_err(ListingServiceError::from)?,
        };

        Ok(FilterSpec {
            search: self.search.clone().unwrap_or_default(),
            property_type: self
                .property_type
                .as_deref()
                .map_or(TypeFilter::All, TypeFilter::only),
            status,
            price_range: PriceRange::from_bounds(self.min_price, self.max_price),
            bedrooms: self.bedrooms.unwrap_or(0),
            bathrooms: self.bathrooms.unwrap_or(0.0),
        })
    }
}

fn resolve_catalog(explicit: Option<PathBuf>) -> Result<Vec<Property>, AppError> {
    let path = match explicit {
        Some(path) => Some(path),
        None => AppConfig::load()?.listings.catalog_path,
    };
    Ok(load_catalog_source(path.as_deref())?)
}

pub(crate) fn run_browse(args: BrowseArgs) -> Result<(), AppError> {
    let filter = args.filter()?;
    let catalog = resolve_catalog(args.catalog.clone())?;
    let visible = compute_visible_properties(&catalog, &filter, args.sort);

    if args.json {
        let rendered = serde_json::to_string_pretty(&visible).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_listing_table(&visible, &filter, args.sort));
    }
    Ok(())
}

pub(crate) fn run_analytics(args: AnalyticsArgs) -> Result<(), AppError> {
    let catalog = resolve_catalog(args.catalog)?;
    let analytics = MarketAnalytics::from_properties(&catalog);
    let rendered = serde_json::to_string_pretty(&analytics).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn render_listing_table(
    properties: &[Property],
    filter: &FilterSpec,
    sort: SortKey,
) -> String {
    let mut out = String::new();
    let noun = if properties.len() == 1 {
        "property"
    } else {
        "properties"
    };
    out.push_str(&format!(
        "{} {noun} found (sorted by {})\n",
        properties.len(),
        sort.label()
    ));
    if filter.active_count() > 0 {
        out.push_str(&format!("Filters: {filter}\n"));
    }

    if properties.is_empty() {
        out.push_str("\nNo properties match your filters.\n");
        out.push_str("Try widening the price range or clearing filters.\n");
        return out;
    }

    out.push('\n');
    for property in properties {
        out.push_str(&format!(
            "#{:<4} {:<28} {:<20} {:<10} {:<9} {:>12}  {} bd / {} ba  {} sqft\n",
            property.id,
            property.title,
            property.location,
            property.property_type,
            property.status,
            format_price(property.price),
            property.bedrooms,
            property.bathrooms,
            property.area,
        ));
    }
    out
}

/// `$1,250,000` style rendering.
pub(crate) fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${grouped}")
}
