//! Command handlers. Each invocation is one session: load, act, save.

use crate::cli::{AddArgs, Command, EditArgs, RandomArgs};
use crate::output::Printer;
use quotebook_core::{
    find_duplicates, merge_tags, random_pick_filtered, search, DirBlobStore, EditError,
    FolderId, QuoteDraft, QuoteStore, QuotebookConfig, Session, TagFilter,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;

pub type CommandResult = Result<(), Box<dyn Error>>;

/// Resolved runtime context shared by all commands.
pub struct AppContext {
    pub config: QuotebookConfig,
    pub folder: FolderId,
    pub printer: Printer,
}

impl AppContext {
    fn store(&self) -> QuoteStore<DirBlobStore> {
        QuoteStore::with_extension(
            DirBlobStore::new(self.config.storage.root.clone()),
            self.config.storage.extension.clone(),
        )
    }

    fn session(&self, db: &str) -> Result<Session<DirBlobStore>, Box<dyn Error>> {
        Ok(Session::open(self.store(), self.folder.clone(), db)?)
    }
}

pub fn run(ctx: &AppContext, command: Command) -> CommandResult {
    match command {
        Command::Collections => {
            let files = ctx.store().list(&ctx.folder)?;
            ctx.printer.files(&files);
        }
        Command::Create { name } => {
            let created = ctx
                .store()
                .create(&ctx.folder, name.as_deref().unwrap_or(""))?;
            ctx.printer.message(&format!("created {}", created.name));
        }
        Command::Drop { name } => {
            if ctx.store().delete(&ctx.folder, &name)? {
                ctx.printer.message(&format!("deleted {name}"));
            } else {
                return Err(format!("no collection named `{name}`").into());
            }
        }
        Command::Show(db) => {
            let session = ctx.session(&db.db)?;
            ctx.printer.quotes(session.table());
        }
        Command::Random(args) => random(ctx, args)?,
        Command::Add(args) => add(ctx, args)?,
        Command::Edit(args) => edit(ctx, args)?,
        Command::Delete(args) => {
            let mut session = ctx.session(&args.db.db)?;
            let removed = session.delete(&args.ids)?;
            session.save()?;
            ctx.printer
                .message(&format!("deleted {} quote(s)", removed.len()));
        }
        Command::Search { db, text } => {
            let session = ctx.session(&db.db)?;
            ctx.printer.quotes(search(session.table().rows(), &text));
        }
        Command::Dups(db) => {
            let session = ctx.session(&db.db)?;
            ctx.printer.quotes(find_duplicates(session.table().rows()));
        }
        Command::Tags(db) => {
            let session = ctx.session(&db.db)?;
            let tags = session.table().known_tags().into_iter().collect::<Vec<_>>();
            ctx.printer.tags(&tags);
        }
        Command::Copy(args) => {
            let session = ctx.session(&args.db.db)?;
            let outcome = session.copy_to(&args.to, &args.ids)?;
            ctx.printer.transfer(&outcome);
        }
        Command::Move(args) => {
            let mut session = ctx.session(&args.db.db)?;
            let outcome = session.move_to(&args.to, &args.ids)?;
            ctx.printer.transfer(&outcome);
        }
        Command::Renumber(db) => {
            let mut session = ctx.session(&db.db)?;
            let changed = session.renumber();
            if !changed.is_empty() {
                session.save()?;
            }
            ctx.printer
                .message(&format!("renumbered {} quote(s)", changed.len()));
        }
    }
    Ok(())
}

fn random(ctx: &AppContext, args: RandomArgs) -> CommandResult {
    let session = ctx.session(&args.db.db)?;
    let default_deny = !args.allow_all && (args.default_deny || ctx.config.filter.default_deny);

    let mut filter = if default_deny {
        TagFilter::default_deny(session.table())
    } else {
        TagFilter::allow_all()
    };
    for tag in &args.allow {
        filter = filter.opt_in(tag);
    }
    for tag in args.include {
        filter = filter.include(tag);
    }
    for tag in args.exclude {
        filter = filter.exclude(tag);
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    ctx.printer
        .quote(random_pick_filtered(session.table().rows(), &filter, &mut rng));
    Ok(())
}

fn add(ctx: &AppContext, args: AddArgs) -> CommandResult {
    let mut session = ctx.session(&args.db.db)?;
    let mut draft = QuoteDraft::new(args.content)
        .with_speaker(args.speaker)
        .with_note(args.note)
        .with_date(args.date)
        .with_tag(merge_tags(&args.tag, &args.pick_tag));
    draft.link = args.link;

    let quote = session.insert(draft)?;
    session.save()?;
    ctx.printer.quote(Some(&quote));
    Ok(())
}

fn edit(ctx: &AppContext, args: EditArgs) -> CommandResult {
    let mut session = ctx.session(&args.db.db)?;
    let current = session
        .table()
        .get(args.id)
        .ok_or(EditError::NotFound(args.id))?;

    let mut draft = QuoteDraft::from_quote(current);
    if let Some(content) = args.content {
        draft.content = content;
    }
    if let Some(speaker) = args.speaker {
        draft.speaker = speaker;
    }
    if let Some(note) = args.note {
        draft.note = note;
    }
    if let Some(date) = args.date {
        draft.date = date;
    }
    if let Some(tag) = args.tag {
        draft.tag = tag;
    }
    if let Some(link) = args.link {
        draft.link = Some(link);
    }

    let quote = session.update(args.id, draft)?;
    session.save()?;
    ctx.printer.quote(Some(&quote));
    Ok(())
}
