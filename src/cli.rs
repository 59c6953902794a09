use std::io::Write;

use chrono::{DateTime, Utc};
use clap::{Subcommand, ValueEnum};
use color_eyre::Result;

use crate::config::Config;
use crate::reminder::{parse_due_date, Recurrence, Reminder, ReminderList, ReminderStore};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print reminders sorted by due date
    List,
    /// Create a reminder
    Add {
        title: String,
        /// Due date: RFC 3339, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD"
        #[arg(long, value_parser = parse_due_date)]
        due: DateTime<Utc>,
        #[arg(long, value_enum, conflicts_with = "every_days")]
        repeat: Option<Repeat>,
        /// Repeat every N days
        #[arg(long)]
        every_days: Option<u32>,
    },
    /// Delete a reminder by id
    Delete { id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Daily,
    Weekly,
    Monthly,
}

/// `--every-days` wins over `--repeat`; clap already rejects passing both.
pub fn recurrence(repeat: Option<Repeat>, every_days: Option<u32>) -> Result<Option<Recurrence>> {
    let recurrence = match (repeat, every_days) {
        (_, Some(days)) => Some(Recurrence::custom(days)?),
        (Some(Repeat::Daily), None) => Some(Recurrence::Daily),
        (Some(Repeat::Weekly), None) => Some(Recurrence::Weekly),
        (Some(Repeat::Monthly), None) => Some(Recurrence::Monthly),
        (None, None) => None,
    };
    Ok(recurrence)
}

pub async fn run(
    command: Command,
    store: &dyn ReminderStore,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    let mut list = ReminderList::new();

    match command {
        Command::List => {
            list.refresh(store).await?;
            if list.is_empty() {
                writeln!(out, "No reminders yet.")?;
            }
            for r in list.reminders() {
                let repeat = r
                    .recurrence
                    .map(|rec| format!(" [{}]", rec.label()))
                    .unwrap_or_default();
                writeln!(
                    out,
                    "{}  {}  {}{}",
                    r.id,
                    r.due_display(&config.date_format),
                    r.title,
                    repeat
                )?;
            }
        }
        Command::Add {
            title,
            due,
            repeat,
            every_days,
        } => {
            let reminder = Reminder::new(title, due).with_recurrence(recurrence(repeat, every_days)?);
            let id = reminder.id.clone();
            store.save_reminder(reminder).await?;
            writeln!(out, "{}", id)?;
        }
        Command::Delete { id } => {
            let left = list.request_delete(store, &id).await?.len();
            writeln!(
                out,
                "Deleted {}. {} reminder{} left.",
                id,
                left,
                if left == 1 { "" } else { "s" }
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::reminder::ReminderError;
    use crate::reminder::{FileStore, StoreError};
    use crate::reminder::list::ListError;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("reminders.toml"))
    }

    async fn exec(store: &FileStore, command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(command, store, &Config::default(), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn add(title: &str, due: &str, repeat: Option<Repeat>, every_days: Option<u32>) -> Command {
        Command::Add {
            title: title.to_string(),
            due: parse_due_date(due).unwrap(),
            repeat,
            every_days,
        }
    }

    #[test]
    fn repeat_flags_map_to_recurrence() {
        assert_eq!(recurrence(None, None).unwrap(), None);
        assert_eq!(recurrence(Some(Repeat::Daily), None).unwrap(), Some(Recurrence::Daily));
        assert_eq!(recurrence(Some(Repeat::Weekly), None).unwrap(), Some(Recurrence::Weekly));
        assert_eq!(recurrence(Some(Repeat::Monthly), None).unwrap(), Some(Recurrence::Monthly));
        assert_eq!(
            recurrence(None, Some(3)).unwrap(),
            Some(Recurrence::Custom { custom_days: 3 })
        );
    }

    #[test]
    fn zero_every_days_is_rejected() {
        let err = recurrence(None, Some(0)).unwrap_err();
        assert_eq!(err.downcast_ref::<ReminderError>(), Some(&ReminderError::ZeroCustomDays));
    }

    #[tokio::test]
    async fn list_on_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = setup(&dir);
        assert_eq!(exec(&store, Command::List).await.unwrap(), "No reminders yet.\n");
    }

    #[tokio::test]
    async fn add_persists_recurrence_and_prints_id() {
        let dir = TempDir::new().unwrap();
        let store = setup(&dir);

        let id = exec(&store, add("Water plants", "2024-01-02", None, Some(3)))
            .await
            .unwrap();
        let id = id.trim();

        let stored = store.get_reminders().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].recurrence, Some(Recurrence::Custom { custom_days: 3 }));
    }

    #[tokio::test]
    async fn add_with_zero_every_days_saves_nothing() {
        let dir = TempDir::new().unwrap();
        let store = setup(&dir);

        let err = exec(&store, add("Never", "2024-01-02", None, Some(0)))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ReminderError>().is_some());
        assert!(store.get_reminders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_prints_in_due_order() {
        let dir = TempDir::new().unwrap();
        let store = setup(&dir);
        exec(&store, add("Later", "2024-01-02", Some(Repeat::Weekly), None))
            .await
            .unwrap();
        exec(&store, add("Sooner", "2024-01-01", None, None))
            .await
            .unwrap();

        let out = exec(&store, Command::List).await.unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Sooner"));
        assert!(lines[1].ends_with("Later [weekly]"));
    }

    #[tokio::test]
    async fn delete_prints_refreshed_count() {
        let dir = TempDir::new().unwrap();
        let store = setup(&dir);
        let first = exec(&store, add("One", "2024-01-01", None, None)).await.unwrap();
        exec(&store, add("Two", "2024-01-02", None, None)).await.unwrap();
        let first = first.trim().to_string();

        let out = exec(&store, Command::Delete { id: first.clone() }).await.unwrap();
        assert_eq!(out, format!("Deleted {}. 1 reminder left.\n", first));
        assert!(store.get_reminders().await.unwrap().iter().all(|r| r.id != first));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_fails() {
        let dir = TempDir::new().unwrap();
        let store = setup(&dir);
        exec(&store, add("One", "2024-01-01", None, None)).await.unwrap();

        let err = exec(&store, Command::Delete { id: "nope".to_string() })
            .await
            .unwrap_err();
        match err.downcast_ref::<ListError>() {
            Some(ListError::Delete { id, source: StoreError::NotFound(_) }) => assert_eq!(id, "nope"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.get_reminders().await.unwrap().len(), 1);
    }
}
