//! The C preamble: headers and `std.io` reader helpers (spec §4.8, §6.6).
//!
//! Grounded in `original_source/codegen.c`'s `generate_code`, which emits a
//! fixed header block followed by static reader helpers, gating the
//! platform-conditional `read_key` block on whether it was referenced.

const HEADERS: &str = "\
#include <stdio.h>
#include <stdlib.h>
#include <stdbool.h>
#include <stdint.h>
#include <inttypes.h>
#include <string.h>
";

const READ_HELPERS: &str = "
static int64_t* lync_read_int(void) {
    int64_t v;
    if (scanf(\"%\" SCNd64, &v) != 1) return NULL;
    int64_t* p = malloc(sizeof(int64_t));
    *p = v;
    return p;
}

static const char* lync_read_str(void) {
    char buf[4096];
    if (!fgets(buf, sizeof(buf), stdin)) return NULL;
    size_t len = strlen(buf);
    if (len > 0 && buf[len - 1] == '\\n') buf[len - 1] = '\\0';
    char* p = malloc(len + 1);
    memcpy(p, buf, len + 1);
    return p;
}

static bool* lync_read_bool(void) {
    char buf[16];
    if (scanf(\"%15s\", buf) != 1) return NULL;
    bool* p = malloc(sizeof(bool));
    *p = strcmp(buf, \"true\") == 0;
    return p;
}

static char* lync_read_char(void) {
    int c = fgetc(stdin);
    if (c == EOF) return NULL;
    char* p = malloc(sizeof(char));
    *p = (char)c;
    return p;
}
";

const READ_KEY_HELPER: &str = "
#ifdef _WIN32
#include <conio.h>
static char* lync_read_key(void) {
    int c = _getch();
    char* p = malloc(sizeof(char));
    *p = (char)c;
    return p;
}
#else
#include <termios.h>
#include <unistd.h>
static char* lync_read_key(void) {
    struct termios oldt, newt;
    if (tcgetattr(STDIN_FILENO, &oldt) != 0) return NULL;
    newt = oldt;
    newt.c_lflag &= (tcflag_t)~(ICANON | ECHO);
    tcsetattr(STDIN_FILENO, TCSANOW, &newt);
    int c = getchar();
    tcsetattr(STDIN_FILENO, TCSANOW, &oldt);
    if (c == EOF) return NULL;
    char* p = malloc(sizeof(char));
    *p = (char)c;
    return p;
}
#endif
";

/// Full preamble text; `uses_read_key` gates the platform-conditional block.
#[must_use]
pub fn preamble(uses_read_key: bool) -> String {
    let mut out = String::new();
    out.push_str(HEADERS);
    out.push_str(READ_HELPERS);
    if uses_read_key {
        out.push_str(READ_KEY_HELPER);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_key_helper_is_gated() {
        assert!(!preamble(false).contains("lync_read_key"));
        assert!(preamble(true).contains("lync_read_key"));
    }
}
