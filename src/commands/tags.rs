// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Tag, TagPatch};
use crate::session::Session;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let color = sub.get_one::<String>("color").map(|s| s.as_str());
            let desc = sub.get_one::<String>("description").map(|s| s.as_str());
            let id = session.create_tag(name, color, desc)?;
            println!("Created tag #{} '{}'", id, name.trim());
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let patch = TagPatch {
                name: sub.get_one::<String>("name").cloned(),
                color: sub.get_one::<String>("color").cloned(),
                description: sub.get_one::<String>("description").cloned(),
            };
            if patch.is_empty() {
                bail!("Nothing to change: pass --name, --color or --description");
            }
            let tag = session.edit_tag(id, &patch)?;
            println!("Updated tag #{} '{}'", tag.id, tag.name);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            session.delete_tag(id)?;
            println!("Removed tag #{}", id);
        }
        Some(("list", sub)) => print_tags(sub, session.all_tags()?)?,
        Some(("search", sub)) => {
            let text = sub.get_one::<String>("text").unwrap();
            print_tags(sub, session.search_tags(text)?)?;
        }
        Some(("link", sub)) => {
            let entry = *sub.get_one::<i64>("entry").unwrap();
            let ids: Vec<i64> = sub.get_many::<i64>("tag").unwrap().copied().collect();
            if ids.len() == 1 {
                session.link(entry, ids[0])?;
                println!("Linked tag #{} to entry #{}", ids[0], entry);
            } else {
                let n = session.link_many(entry, &ids)?;
                println!("Linked {} of {} tags to entry #{}", n, ids.len(), entry);
            }
        }
        Some(("unlink", sub)) => {
            let entry = *sub.get_one::<i64>("entry").unwrap();
            let ids: Vec<i64> = sub.get_many::<i64>("tag").unwrap().copied().collect();
            let n = session.unlink_many(entry, &ids)?;
            println!("Removed {} tag link(s) from entry #{}", n, entry);
        }
        Some(("set", sub)) => {
            let entry = *sub.get_one::<i64>("entry").unwrap();
            let ids: Vec<i64> = sub
                .get_many::<i64>("tag")
                .map(|v| v.copied().collect())
                .unwrap_or_default();
            session.replace_links(entry, &ids)?;
            println!("Entry #{} now has {} tag(s)", entry, session.tags_for(entry)?.len());
        }
        Some(("entries", sub)) => {
            let tag_id = *sub.get_one::<i64>("tag").unwrap();
            let tag = session.get_tag(tag_id)?;
            let ids: Vec<i64> = session.entries_for(tag_id)?.into_iter().collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ids)? {
                let rows = ids
                    .iter()
                    .map(|id| {
                        let subject = session.get(*id).map(|e| e.subject).unwrap_or_default();
                        vec![id.to_string(), subject]
                    })
                    .collect();
                println!("Tag '{}':", tag.name);
                println!("{}", pretty_table(&["Entry", "Subject"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

fn print_tags(sub: &clap::ArgMatches, tags: Vec<Tag>) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tags)? {
        let rows = tags
            .into_iter()
            .map(|t| vec![t.id.to_string(), t.name, t.color, t.description])
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Name", "Color", "Description"], rows)
        );
    }
    Ok(())
}
