use clap::Parser;
use pubfig::ArticleSize;

#[derive(Debug, Parser)]
#[command(name = "figsize")]
#[command(about = "Print figure width and height derived from the article textwidth")]
struct Args {
    #[arg(long, help = "Scale factor; 0 or absent means unscaled")]
    scale: Option<f64>,

    #[arg(long, help = "Document textwidth in cm")]
    textwidth: Option<f64>,

    #[arg(long = "float", help = "Print bare numbers without the cm unit")]
    as_float: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(scale) = args.scale {
        anyhow::ensure!(scale.is_finite() && scale >= 0.0, "scale must be a finite number >= 0, got {}", scale);
    }
    let size = match args.textwidth {
        Some(width) => {
            anyhow::ensure!(width.is_finite() && width > 0.0, "textwidth must be positive, got {}", width);
            ArticleSize::from_textwidth(width)
        }
        None => ArticleSize::new(),
    };

    let (w, h) = (size.w(args.scale), size.h(args.scale));
    if args.as_float {
        println!("{}", w.value());
        println!("{}", h.value());
    } else {
        println!("{}", w);
        println!("{}", h);
    }
    Ok(())
}
