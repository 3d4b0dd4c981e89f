use clap::{Parser, Subcommand};
use neojc_class::ClassPool;
use neojc_compiler::{CompileOptions, NeoModule, Script, compile_class};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "neojc", about = "JVM bytecode to NeoVM compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a contract class from a YAML class pool
    Compile {
        /// Path to the class pool (.yaml)
        input: PathBuf,
        /// Internal name of the contract class, e.g. com/example/Token
        #[arg(short, long)]
        class: String,
        /// Write the raw script here instead of printing a listing
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep every jump, call and try in its long form
        #[arg(long)]
        no_optimize: bool,
    },
    /// Disassemble a raw NeoVM script
    Disasm {
        /// Path to the script file
        input: PathBuf,
    },
    /// List the classes and methods of a class pool
    Classes {
        /// Path to the class pool (.yaml)
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            input,
            class,
            output,
            no_optimize,
        } => cmd_compile(&input, &class, output.as_deref(), !no_optimize),
        Commands::Disasm { input } => cmd_disasm(&input),
        Commands::Classes { input } => cmd_classes(&input),
    }
}

fn open_pool(path: &Path) -> ClassPool {
    match ClassPool::open(path) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_compile(input: &Path, class: &str, output: Option<&Path>, optimize: bool) {
    let pool = open_pool(input);
    let options = CompileOptions { optimize };
    let script = compile_class(Box::new(pool), class, options).and_then(|module| {
        let script = module.assemble(&options)?;
        Ok((module, script))
    });
    let (module, script) = match script {
        Ok(compiled) => compiled,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = output {
        fs::write(path, &script.bytes).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", path.display());
            std::process::exit(1);
        });
        log::info!("wrote {} bytes to {}", script.bytes.len(), path.display());
        return;
    }
    print_listing(&module, &script);
}

fn print_listing(module: &NeoModule, script: &Script) {
    println!("# Class: {}", module.methods().next().map_or("?", |m| m.owner().name.as_str()));
    println!("# Script size: {} bytes", script.bytes.len());
    println!("# Static slots: {}", module.static_slot_count());
    for (i, token) in module.tokens().iter().enumerate() {
        let hash: Vec<u8> = token.hash.iter().rev().copied().collect();
        println!(
            "# Token #{i}: 0x{}.{} params={} return={} flags={:?}",
            hex::encode(hash),
            token.method,
            token.params,
            token.has_return,
            token.call_flags
        );
    }
    for event in module.events() {
        println!("# Event: {} params={}", event.name, event.params);
    }
    println!();

    let instructions = match neojc_isa::decode(&script.bytes) {
        Ok(insns) => insns,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    for (insn, offset) in &instructions {
        if let Some((name, _)) = script.methods.iter().find(|(_, start)| start == offset) {
            println!("{name}:");
        }
        println!("    {offset:#06x}  {insn}");
    }
}

fn cmd_disasm(path: &Path) {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let instructions = match neojc_isa::decode(&bytes) {
        Ok(insns) => insns,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    println!("# NeoVM Disassembly");
    println!("# Size: {} bytes, Instructions: {}", bytes.len(), instructions.len());
    println!();
    for (insn, offset) in &instructions {
        match insn.jump_offset() {
            Some(delta) => {
                let target = *offset as i64 + i64::from(delta);
                println!("{offset:#06x}  {}  -> {target:#06x}", insn.opcode);
            }
            None => println!("{offset:#06x}  {insn}"),
        }
    }
}

fn cmd_classes(path: &Path) {
    let pool = open_pool(path);
    println!("# Classes: {}", pool.len());
    for class in pool.classes() {
        println!();
        match class.super_name.as_deref() {
            Some(super_name) => println!("{} extends {super_name}", class.name),
            None => println!("{}", class.name),
        }
        if let Some(hash) = class.contract_hash() {
            println!("    # contract hash {hash}");
        }
        for field in &class.fields {
            let kind = if field.is_static() { "static " } else { "" };
            println!("    {kind}field {} {}", field.name, field.desc);
        }
        for method in &class.methods {
            let kind = if method.is_static() { "static " } else { "" };
            println!(
                "    {kind}method {}{} ({} insns)",
                method.name,
                method.desc,
                method.insns.len()
            );
        }
    }
}
