use kpdg::graph::format_edges;
use kpdg::search::{run_search, SearchConfig};

fn main() {
    let mut cfg = SearchConfig::default();
    let mut case: Option<(usize, usize)> = None;
    let mut save: Option<String> = None;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--case" => {
                let k = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                let n = args.get(i + 2).unwrap_or_else(|| usage_and_exit(2));
                case = Some((
                    k.parse().unwrap_or_else(|_| usage_and_exit(2)),
                    n.parse().unwrap_or_else(|_| usage_and_exit(2)),
                ));
                i += 3;
            }
            "--save" => {
                save = Some(args.get(i + 1).unwrap_or_else(|| usage_and_exit(2)).clone());
                i += 2;
            }
            "--quiet" => {
                cfg.quiet = true;
                i += 1;
            }
            "--help" | "-h" => usage_and_exit(0),
            _ => usage_and_exit(2),
        }
    }

    let (k, n) = case.unwrap_or((3, 5));
    match (k, n) {
        (2, 2) => run_case::<2, 2>(&cfg, save.as_deref()),
        (2, 3) => run_case::<2, 3>(&cfg, save.as_deref()),
        (2, 4) => run_case::<2, 4>(&cfg, save.as_deref()),
        (2, 5) => run_case::<2, 5>(&cfg, save.as_deref()),
        (2, 6) => run_case::<2, 6>(&cfg, save.as_deref()),
        (2, 7) => run_case::<2, 7>(&cfg, save.as_deref()),
        (3, 3) => run_case::<3, 3>(&cfg, save.as_deref()),
        (3, 4) => run_case::<3, 4>(&cfg, save.as_deref()),
        (3, 5) => run_case::<3, 5>(&cfg, save.as_deref()),
        (3, 6) => run_case::<3, 6>(&cfg, save.as_deref()),
        (3, 7) => run_case::<3, 7>(&cfg, save.as_deref()),
        (4, 4) => run_case::<4, 4>(&cfg, save.as_deref()),
        (4, 5) => run_case::<4, 5>(&cfg, save.as_deref()),
        (4, 6) => run_case::<4, 6>(&cfg, save.as_deref()),
        (4, 7) => run_case::<4, 7>(&cfg, save.as_deref()),
        (5, 5) => run_case::<5, 5>(&cfg, save.as_deref()),
        (5, 6) => run_case::<5, 6>(&cfg, save.as_deref()),
        (5, 7) => run_case::<5, 7>(&cfg, save.as_deref()),
        (6, 6) => run_case::<6, 6>(&cfg, save.as_deref()),
        (6, 7) => run_case::<6, 7>(&cfg, save.as_deref()),
        (7, 7) => run_case::<7, 7>(&cfg, save.as_deref()),
        _ => {
            eprintln!("Unsupported --case {k} {n}: need 2 <= k <= n <= 7.");
            std::process::exit(2);
        }
    }
}

fn run_case<const K: usize, const N: usize>(cfg: &SearchConfig, save: Option<&str>) {
    let result = run_search::<K, N>(cfg);

    println!("k={K}, n={N}: minimum theta = {}", result.min_theta);
    println!("Produced by graph: {}", format_edges(&result.witness));

    if let Some(path) = save {
        if let Err(e) = std::fs::write(path, format!("{}\n", format_edges(&result.witness))) {
            eprintln!("Failed to save witness to {path}: {e}");
            std::process::exit(1);
        }
        println!("Witness saved to {path}");
    }
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  kpdg [--case K N] [--save PATH] [--quiet]\n\nOptions:\n  --case K N   Edge size and vertex count, 2 <= K <= N <= 7 (default: 3 5)\n  --save PATH  Write the witness edge set to a file\n  --quiet      Suppress progress and stats printing\n  --help       Show this help\n"
    );
    std::process::exit(code)
}
