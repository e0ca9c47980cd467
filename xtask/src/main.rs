use std::process::Command;

const WASM_TARGET: &str = "wasm32-unknown-unknown";
const DEMO_DIR: &str = "demos/counter";

#[derive(Clone, Copy, Debug)]
enum Task {
    /// Build the counter demo and generate its JS bindings into `pkg/`.
    CounterBuild,
    /// Rebuild the counter demo whenever the library or demo sources change.
    CounterServe,
    /// Native unit tests plus the headless browser tests.
    Test,
}

impl Task {
    const ALL: &'static [(&'static str, Task)] = &[
        ("counter-build", Task::CounterBuild),
        ("counter-serve", Task::CounterServe),
        ("test", Task::Test),
    ];

    fn parse(args: &[String]) -> Result<Self, String> {
        let [name] = args else {
            return Err(format!("expected exactly one task, got {}", args.len()));
        };
        Self::ALL
            .iter()
            .find(|(task_name, _)| *task_name == name.as_str())
            .map(|(_, task)| *task)
            .ok_or_else(|| format!("unknown task '{}'", name))
    }

    fn names() -> String {
        Self::ALL
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn run(self) -> Result<(), String> {
        match self {
            Task::CounterBuild => {
                run(DEMO_DIR, "cargo", &["build", "--target", WASM_TARGET])?;
                let wasm = format!("./target/{}/debug/cre_counter.wasm", WASM_TARGET);
                let out_dir = format!("{}/pkg", DEMO_DIR);
                // Widget instances are owned by their host elements and only
                // freed through JS finalization, which needs weak refs.
                run(
                    "./",
                    "wasm-bindgen",
                    &[
                        "--target",
                        "web",
                        "--no-typescript",
                        "--weak-refs",
                        "--out-dir",
                        &out_dir,
                        &wasm,
                    ],
                )
            }
            Task::CounterServe => {
                let demo_src = format!("{}/src", DEMO_DIR);
                run(
                    "./",
                    "cargo",
                    &[
                        "watch",
                        "-w",
                        &demo_src,
                        "-w",
                        "cre/src",
                        "-s",
                        "cargo xtask counter-build",
                    ],
                )
            }
            Task::Test => {
                run("cre", "cargo", &["test"])?;
                run("cre", "wasm-pack", &["test", "--headless", "--firefox"])
            }
        }
    }
}

fn run(dir: &str, program: &str, args: &[&str]) -> Result<(), String> {
    let line = format!("{} {}", program, args.join(" "));
    eprintln!("[{}] {}", dir, line);

    let status = Command::new(program)
        .current_dir(dir)
        .args(args)
        .status()
        .map_err(|err| format!("could not start '{}': {}", line, err))?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("'{}' failed with {}", line, status))
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = Task::parse(&args).and_then(Task::run);
    if let Err(err) = result {
        eprintln!("xtask: {}", err);
        eprintln!("available tasks: {}", Task::names());
        std::process::exit(1);
    }
}
