use homework_tracker::{
    Assignment, AssignmentKey, AssignmentService, FlatFileStore, RepeatType, ServiceError,
    export_assignments_to_csv, export_assignments_to_json, import_assignments_from_csv,
    import_assignments_from_json,
};
use std::io::{self, Write};
use std::path::PathBuf;

fn render_table(entries: &[(usize, Assignment)]) -> String {
    let headers = ["#", "due_date", "name", "course", "repeat"];
    let rows: Vec<[String; 5]> = entries
        .iter()
        .map(|(index, a)| {
            [
                index.to_string(),
                a.due_date_iso(),
                a.name.clone(),
                a.course.clone(),
                a.repeat_type.to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            let pad = widths[ci].saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    out.push_str(&render_row(&header_cells));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                                      Show this help\n  list                                      List assignments by due date (# is the file index)\n  keys                                      List assignments with their content keys\n  add <name> <course> <YYYY-MM-DD> [repeat] Add an assignment (repeat: none|weekly|monthly)\n  delete <index>                            Delete by file index\n  delete-key <key>                          Delete by content key\n  export <json|csv> <path>                  Write all assignments to a file\n  import <json|csv> <path>                  Append assignments from a file\n  repeats                                   List repeat types\n  quit|exit                                 Exit"
    );
}

fn print_list(service: &AssignmentService<FlatFileStore>) {
    match service.list_entries() {
        Ok(entries) => {
            let rows: Vec<(usize, Assignment)> = entries
                .into_iter()
                .map(|entry| (entry.index, entry.assignment))
                .collect();
            println!("{}", render_table(&rows));
        }
        Err(e) => println!("Error loading assignments: {}", e),
    }
}

fn data_file() -> PathBuf {
    std::env::var("HOMEWORK_DATA_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(homework_tracker::config::DEFAULT_DATA_FILE))
}

fn main() {
    homework_tracker::init_tracing();
    let service = AssignmentService::new(FlatFileStore::new(data_file()));

    println!("Homework Tracker (CLI) - type 'help' for commands\n");
    print_list(&service);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "list" => print_list(&service),
            "keys" => match service.list_entries() {
                Ok(entries) => {
                    for entry in entries {
                        println!(
                            "{}  {}  {}",
                            entry.key,
                            entry.assignment.due_date_iso(),
                            entry.assignment.name
                        );
                    }
                }
                Err(e) => println!("Error loading assignments: {}", e),
            },
            "repeats" => {
                println!("Available repeat types:");
                for (key, description) in RepeatType::variants() {
                    println!("  {:<10} {}", key, description);
                }
            }
            "add" => {
                let name = parts.next();
                let course = parts.next();
                let due = parts.next();
                let repeat = parts.next().unwrap_or("none");
                match (name, course, due) {
                    (Some(name), Some(course), Some(due)) => {
                        match service.add(name, course, due, repeat) {
                            Ok(record) => println!(
                                "Added '{}' ({}) due {}.",
                                record.name,
                                record.course,
                                record.due_date_iso()
                            ),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: add <name> <course> <YYYY-MM-DD> [repeat]"),
                }
            }
            "delete" => match parts.next() {
                Some(index_s) => match index_s.parse::<i64>() {
                    Ok(index) => match service.delete(index) {
                        Ok(removed) => println!("Deleted '{}'.", removed.name),
                        Err(e) => println!("Error: {}", e),
                    },
                    Err(_) => println!("Invalid index"),
                },
                None => println!("Usage: delete <index>"),
            },
            "delete-key" => match parts.next() {
                Some(key) => match service.delete_by_key(&AssignmentKey::from(key)) {
                    Ok(removed) => println!("Deleted '{}'.", removed.name),
                    Err(e) => println!("Error: {}", e),
                },
                None => println!("Usage: delete-key <key>"),
            },
            "export" => {
                let kind = parts.next();
                let path = parts.next();
                match (kind, path) {
                    (Some(kind), Some(path)) => {
                        let records = match service.list() {
                            Ok(records) => records,
                            Err(e) => {
                                println!("Error loading assignments: {}", e);
                                continue;
                            }
                        };
                        let res = match kind {
                            "json" => export_assignments_to_json(&records, path),
                            "csv" => export_assignments_to_csv(&records, path),
                            _ => {
                                println!("Unknown format '{}', expected json or csv", kind);
                                continue;
                            }
                        };
                        match res {
                            Ok(()) => println!("Exported {} assignments to {}", records.len(), path),
                            Err(e) => println!("Export error: {}", e),
                        }
                    }
                    _ => println!("Usage: export <json|csv> <path>"),
                }
            }
            "import" => {
                let kind = parts.next();
                let path = parts.next();
                match (kind, path) {
                    (Some(kind), Some(path)) => {
                        let loaded = match kind {
                            "json" => import_assignments_from_json(path),
                            "csv" => import_assignments_from_csv(path),
                            _ => {
                                println!("Unknown format '{}', expected json or csv", kind);
                                continue;
                            }
                        };
                        match loaded.map_err(ServiceError::from).and_then(|r| service.extend(r)) {
                            Ok(count) => println!("Imported {} assignments from {}", count, path),
                            Err(e) => println!("Import error: {}", e),
                        }
                    }
                    _ => println!("Usage: import <json|csv> <path>"),
                }
            }
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }
}
