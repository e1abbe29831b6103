use crate::errors::CliError;
use crate::println_pad;
use crate::utils::format_size;
use camino::Utf8Path;
use colored::Colorize;
use metk_toc::TocFile;

pub struct InfoTocFileArgs {
    pub file_path: String,
}

pub fn info_toc_file(args: InfoTocFileArgs) -> miette::Result<()> {
    let path = Utf8Path::new(&args.file_path);
    let toc = TocFile::from_path(path).map_err(CliError::from)?;

    let empty_buckets = toc.buckets.iter().filter(|b| b.is_empty()).count();
    let indexed_bytes: u64 = toc.entries().map(|e| u64::from(e.size)).sum();

    println_pad!(
        "{} {}",
        "📚 TOC:".bright_blue().bold(),
        path.as_str().bright_cyan().bold()
    );
    println_pad!(
        "{} {}",
        "🗂️ Buckets:".bright_green(),
        format!(
            "{} ({} empty)",
            toc.header.hash_table_count, empty_buckets
        )
        .bright_white()
        .bold()
    );
    println_pad!(
        "{} {}",
        "📄 Files:".bright_yellow(),
        format!("{} ({} indexed)", toc.entry_count(), format_size(indexed_bytes)).bright_white()
    );

    println_pad!("\n{}", "🧾 Entries:".bright_magenta().bold());
    for (index, bucket) in toc.buckets.iter().enumerate() {
        for entry in bucket {
            println_pad!(
                "   {} {} {}",
                format!("[{:>5}]", index).dimmed(),
                entry.path.bright_white(),
                format!("({} bytes)", entry.size).dimmed()
            );
        }
    }

    Ok(())
}
