use clap::{Command, ValueEnum};
use clap_complete::{Shell as CompleteShell, generate};
use std::io;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

/// Shell code that wraps `wtt-bin` in a `wtt` function and adds the active
/// repository to the prompt.
///
/// The wrapper lets prompts reach the terminal through stderr, captures
/// stdout and `cd`s into it when it names a directory. Source it from the
/// shell's rc file, e.g. `eval "$(wtt-bin --init zsh)"`.
#[must_use]
pub fn shell_integration(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash => BASH_INTEGRATION,
        Shell::Zsh => ZSH_INTEGRATION,
        Shell::Fish => FISH_INTEGRATION,
    }
}

/// Generate native shell completions using clap
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    let clap_shell = match shell {
        Shell::Bash => CompleteShell::Bash,
        Shell::Zsh => CompleteShell::Zsh,
        Shell::Fish => CompleteShell::Fish,
    };

    generate(
        clap_shell,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

const ZSH_INTEGRATION: &str = r#"# wtt shell integration for Zsh
# Wraps wtt-bin so that create, list and jump can change directory.

wtt() {
  local output
  output=$(wtt-bin "$@" 2>/dev/tty)
  local exit_code=$?
  if [ $exit_code -ne 0 ]; then
    return $exit_code
  fi
  if [ -n "$output" ] && [ -d "$output" ]; then
    cd "$output" || return 1
  elif [ -n "$output" ]; then
    echo "$output"
  fi
}

# Completions for the wrapper, borrowed from wtt-bin's clap completions.
if command -v wtt-bin >/dev/null 2>&1 && (( $+functions[compdef] )); then
  eval "$(wtt-bin completions zsh 2>/dev/null | sed '/^if \[ "$funcstack\[1\]" = "_wtt-bin" \]; then/,/^fi$/d')"
  compdef _wtt-bin wtt
fi

# Prompt integration: show the active repo on the right.

# Powerlevel10k segment.
prompt_wtt() {
  local ctx
  ctx=$(wtt-bin context 2>/dev/null) || return
  [[ -z "$ctx" ]] && return
  p10k segment -f cyan -i $'' -t "$ctx"
}
instant_prompt_wtt() { prompt_wtt; }

_wtt_precmd() {
  local ctx
  ctx=$(wtt-bin context 2>/dev/null)
  _WTT_PS1="${ctx:+%F{cyan}$'' ${ctx}%f}"
}

# Runs once on the first prompt, after every plugin has loaded.
_wtt_setup() {
  precmd_functions=("${(@)precmd_functions:#_wtt_setup}")

  if typeset -f p10k > /dev/null 2>&1; then
    if [[ ${POWERLEVEL9K_RIGHT_PROMPT_ELEMENTS[(r)wtt]} != wtt ]]; then
      local end_idx=${POWERLEVEL9K_RIGHT_PROMPT_ELEMENTS[(i)end]}
      if (( end_idx <= ${#POWERLEVEL9K_RIGHT_PROMPT_ELEMENTS} )); then
        POWERLEVEL9K_RIGHT_PROMPT_ELEMENTS=(
          "${POWERLEVEL9K_RIGHT_PROMPT_ELEMENTS[@]:0:$((end_idx-1))}"
          wtt
          "${POWERLEVEL9K_RIGHT_PROMPT_ELEMENTS[@]:$((end_idx-1))}"
        )
      else
        POWERLEVEL9K_RIGHT_PROMPT_ELEMENTS+=(wtt)
      fi
      typeset -g POWERLEVEL9K_RIGHT_PROMPT_ELEMENTS
      p10k reload 2>/dev/null
    fi
    return
  fi

  setopt prompt_subst
  precmd_functions+=(_wtt_precmd)
  _wtt_precmd
  if [[ -n "$RPROMPT" ]]; then
    RPROMPT='${_WTT_PS1}${_WTT_PS1:+ }'"$RPROMPT"
  else
    RPROMPT='${_WTT_PS1}'
  fi
}

precmd_functions+=(_wtt_setup)
"#;

const BASH_INTEGRATION: &str = r#"# wtt shell integration for Bash
# Wraps wtt-bin so that create, list and jump can change directory.

wtt() {
  local output
  output=$(wtt-bin "$@" 2>/dev/tty)
  local exit_code=$?
  if [ $exit_code -ne 0 ]; then
    return $exit_code
  fi
  if [ -n "$output" ] && [ -d "$output" ]; then
    cd "$output" || return 1
  elif [ -n "$output" ]; then
    echo "$output"
  fi
}

# Completions for the wrapper, borrowed from wtt-bin's clap completions.
if command -v wtt-bin >/dev/null 2>&1; then
  eval "$(wtt-bin completions bash 2>/dev/null)"
  if declare -F _wtt-bin >/dev/null 2>&1; then
    complete -F _wtt-bin -o bashdefault -o default wtt
  fi
fi

# Prompt integration: prefix PS1 with the active repo.
_wtt_update_ps1() {
  local ctx
  ctx=$(wtt-bin context 2>/dev/null)
  if [[ -n "$ctx" ]]; then
    _WTT_PS1=$'\001\e[36m\002'" ${ctx}"$'\001\e[0m\002 '
  else
    _WTT_PS1=""
  fi
}

PROMPT_COMMAND="_wtt_update_ps1${PROMPT_COMMAND:+;$PROMPT_COMMAND}"
PS1='${_WTT_PS1}'"$PS1"
"#;

const FISH_INTEGRATION: &str = r#"# wtt shell integration for Fish
# Wraps wtt-bin so that create, list and jump can change directory.

function wtt
  set output (wtt-bin $argv 2>/dev/tty)
  set exit_code $status
  if test $exit_code -ne 0
    return $exit_code
  end
  if test -n "$output"; and test -d "$output"
    cd "$output"
  else if test -n "$output"
    echo "$output"
  end
end

# Completions for the wrapper, borrowed from wtt-bin's clap completions.
if command -q wtt-bin
  wtt-bin completions fish 2>/dev/null | source
  complete -c wtt -w wtt-bin
end

# Prompt integration. Themes that define their own right prompt (Tide,
# Starship) can call wtt_segment from it.
function wtt_segment
  set ctx (wtt-bin context 2>/dev/null)
  if test -n "$ctx"
    set_color cyan
    printf ' %s ' $ctx
    set_color normal
  end
end

if not functions -q fish_right_prompt
  function fish_right_prompt
    wtt_segment
  end
end
"#;
