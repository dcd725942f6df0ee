// ccc: concurrent expression compiler front end

use std::io;
use std::process::ExitCode;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use ccc::driver::{back_end, front_end};
use ccc::ui::App;

struct Options {
    show_tree: bool,
    view: bool,
    paths: Vec<String>,
}

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} [--tree | --view] <file>...", program_name);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tree      Print the syntax tree and the AST in level order");
    eprintln!("  --view      Open the terminal viewer for a single file");
    eprintln!("  -h, --help  Show this message");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        show_tree: false,
        view: false,
        paths: Vec::new(),
    };

    for arg in args {
        match arg.as_str() {
            "--tree" => options.show_tree = true,
            "--view" => options.view = true,
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("Unknown option '{}'", flag));
            }
            path => options.paths.push(path.to_string()),
        }
    }

    if options.paths.is_empty() {
        return Err("No input file provided".to_string());
    }
    if options.view && options.paths.len() != 1 {
        return Err("--view takes exactly one file".to_string());
    }
    Ok(options)
}

/// Compile and evaluate one file, reporting to stdout/stderr. Returns whether
/// it succeeded.
fn compile_one(path: &str, show_tree: bool) -> bool {
    eprintln!("Compiling {}...", path);

    let syntax_tree = match front_end(path) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{}", e);
            return false;
        }
    };
    eprintln!("Parsed successfully. Syntax tree has {} nodes.", syntax_tree.len());

    if show_tree {
        println!("Syntax tree:");
        println!("{}", syntax_tree.render_levels());
    }

    match back_end(syntax_tree) {
        Ok(compilation) => {
            if show_tree {
                println!("AST:");
                println!("{}", compilation.ast.render_levels());
            }
            println!(
                "{}: {} ({})",
                path, compilation.result.lexeme, compilation.result.kind
            );
            true
        }
        Err(e) => {
            eprintln!("{}", e);
            false
        }
    }
}

fn view(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::load(path)?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("ccc");

    if args.iter().skip(1).any(|a| a == "-h" || a == "--help") {
        print_usage(program_name);
        return ExitCode::SUCCESS;
    }

    let options = match parse_args(&args[1.min(args.len())..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(program_name);
            return ExitCode::FAILURE;
        }
    };

    if options.view {
        return match view(&options.paths[0]) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let mut failed = false;
    for path in &options.paths {
        if !compile_one(path, options.show_tree) {
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
