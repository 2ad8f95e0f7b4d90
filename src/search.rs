//! 対話式検索
//!
//! 検索語を入力するたびに表を絞り込んで再表示する。空Enterで全件、`:q` で終了。

use crate::error::{ContactExtractError, Result};
use crate::render;
use contact_extract_common::ViewState;
use dialoguer::Input;

/// 終了コマンド
pub const QUIT_COMMAND: &str = ":q";

/// 入力1件を状態に反映する。終了なら None
pub fn apply_input(state: ViewState, input: &str) -> Option<ViewState> {
    let term = input.trim();
    if term == QUIT_COMMAND {
        None
    } else {
        Some(state.set_search_term(term))
    }
}

/// 対話式で検索
pub fn run_interactive_search(mut state: ViewState) -> Result<ViewState> {
    if state.result.is_none() {
        return Ok(state);
    }

    println!("---");
    println!("操作: 検索語を入力 [Enter]全件表示 [{}]終了", QUIT_COMMAND);
    println!("---\n");

    loop {
        let input: String = Input::new()
            .with_prompt("Search the table")
            .allow_empty(true)
            .with_initial_text(state.search_term.clone())
            .interact_text()
            .map_err(|e| ContactExtractError::Prompt(e.to_string()))?;

        match apply_input(state.clone(), &input) {
            Some(next) => {
                state = next;
                print!("{}", render::render_state(&state));
            }
            None => return Ok(state),
        }
    }
}
