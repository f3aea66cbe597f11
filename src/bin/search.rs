// PinSearch CLI Tool
// Command-line interface for fuzzy pinyin search

use clap::{Parser, ValueEnum};
use pinsearch::{format_reading, Logic, PinDict, PinyinFormat, TreeSearcher};

/// Built-in demo candidates used when no candidate file is given
const DEMO_CANDIDATES: &[&str] = &[
    "北京", "上海", "广州", "深圳", "南京", "西安", "成都", "武汉", "杭州", "苏州",
    "天津", "重庆", "长沙", "郑州", "青岛", "厦门", "合肥", "兰州", "贵阳", "宁波",
];

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogicArg {
    /// Query must be a prefix of the candidate
    Begin,
    /// Query may start anywhere inside the candidate
    Contain,
    /// Query must account for the whole candidate
    Equal,
}

impl From<LogicArg> for Logic {
    fn from(arg: LogicArg) -> Logic {
        match arg {
            LogicArg::Begin => Logic::Begin,
            LogicArg::Contain => Logic::Contain,
            LogicArg::Equal => Logic::Equal,
        }
    }
}

/// PinSearch - fuzzy pinyin lookup over a candidate list
#[derive(Parser, Debug)]
#[command(name = "pinsearch")]
#[command(about = "Search Chinese candidates by partial pinyin input", long_about = None)]
#[command(version)]
struct Args {
    /// Query text: pinyin letters, first-letter sequences, or literal hanzi
    #[arg(value_name = "QUERY")]
    query: String,

    /// Pinyin dictionary file (defaults to the built-in mini dictionary)
    #[arg(short, long)]
    dict: Option<String>,

    /// Candidate file, one entry per line (defaults to a demo list)
    #[arg(short, long)]
    file: Option<String>,

    /// Acceptance rule
    #[arg(short, long, value_enum, default_value_t = LogicArg::Contain)]
    logic: LogicArg,

    /// Maximum number of results to display
    #[arg(long, default_value = "20")]
    limit: usize,

    /// Show each result's readings in diacritic form
    #[arg(short, long)]
    readings: bool,

    /// Enable every fuzzy rule pair (zh/z, ang/an, v/u, ...)
    #[arg(short = 'z', long)]
    fuzzy: bool,

    /// Show detailed information
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.verbose {
        println!("🔍 Loading dictionary...");
    }
    let mut dict = match &args.dict {
        Some(path) => PinDict::from_path(path)?,
        None => PinDict::builtin(),
    };

    if args.fuzzy {
        let mut config = dict.config();
        config.fuzzy = pinsearch::FuzzySettings::all();
        config.commit();
    }

    let candidates: Vec<String> = match &args.file {
        Some(path) => std::fs::read_to_string(path)?
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        None => DEMO_CANDIDATES.iter().map(|s| s.to_string()).collect(),
    };

    let mut searcher = TreeSearcher::new(args.logic.into());
    for candidate in &candidates {
        searcher.insert(&dict, candidate);
    }

    if args.verbose {
        println!("✅ Indexed {} candidates\n", searcher.candidates());
        println!("🔎 Searching in {} mode: {}", searcher.logic(), args.query);
        println!("─────────────────────────────────────────────────\n");
    } else {
        println!("Mode: {}", searcher.logic());
    }

    let mut results = searcher.search_strings(&dict, &args.query);
    results.truncate(args.limit);

    if results.is_empty() {
        println!("❌ No matches found.");
        return Ok(());
    }

    println!("✅ Found {} matches:\n", results.len());

    for (idx, text) in results.iter().enumerate() {
        print!("{}. {:<12}", idx + 1, text);

        if args.readings {
            print!("→ ");
            let per_char: Vec<String> = dict
                .readings_list(text, true)
                .iter()
                .map(|readings| {
                    readings
                        .iter()
                        .map(|r| format_reading(r, PinyinFormat::Unicode))
                        .collect::<Vec<_>>()
                        .join("/")
                })
                .collect();
            print!("{}", per_char.join(" "));
        }
        println!();
    }

    if args.verbose {
        println!("\n─────────────────────────────────────────────────");
        println!("✨ Search completed successfully!");
    }

    Ok(())
}
