// src/coach_cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::app_log;
use crate::core::{CoachApi, ConfigManager, FsOps, ResumeStore, ServiceClient};
use crate::devices::{ClipFileSource, CommandAudioSource, FileAudioSink};
use crate::session::{
    practice, voice, ArenaSession, AudioSource, Dashboard, InterviewSession, Loaded, Page,
    PracticeSession, QuizSession, UploadPage, VoiceRecorder, MAX_EXCHANGES,
};
use crate::types::{CodeReview, Evaluation, Question};

#[derive(Parser)]
#[command(name = "interview-coach")]
#[command(about = "Practice interviews against the AI Interview Coach backend")]
pub struct CoachCli {
    #[command(subcommand)]
    pub command: CoachCommand,
}

#[derive(Subcommand)]
pub enum CoachCommand {
    /// Upload a resume (pdf, docx or txt) and store the parsed result
    Upload {
        file: PathBuf,
        /// Go straight into the interview afterwards
        #[arg(long)]
        start: bool,
    },
    /// Run the interview, then the arena and the quiz
    Interview {
        #[arg(long)]
        role: Option<String>,
        /// Use this audio file as the microphone for /record
        #[arg(long)]
        clip: Option<PathBuf>,
    },
    /// Answer a generated question set, each answer evaluated on its own
    Practice {
        #[arg(long)]
        role: Option<String>,
        #[arg(long, default_value = practice::DEFAULT_DIFFICULTY)]
        difficulty: String,
        #[arg(long, default_value_t = practice::DEFAULT_COUNT)]
        count: u32,
    },
    /// Solve a coding problem
    Arena {
        #[arg(long)]
        role: Option<String>,
        /// Submit this file instead of typing the solution
        #[arg(long)]
        code_file: Option<PathBuf>,
    },
    /// Take the skill quiz
    Quiz,
    /// Show performance history
    Dashboard {
        /// Also export the records to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Synthesize speech for a text
    Speak {
        text: String,
        /// Directory for the audio file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Transcribe an audio clip
    Listen { file: PathBuf },
    /// Evaluate a single answer
    Evaluate {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
    },
    /// Forget the stored resume
    Reset,
}

/// Everything a page needs: backend, storage and configuration
pub struct CoachContext {
    pub api: Arc<dyn CoachApi>,
    pub store: ResumeStore,
    pub config: ConfigManager,
}

impl CoachContext {
    pub fn new(config: ConfigManager) -> Result<Self> {
        let client = ServiceClient::new(&config.service.api_url, config.service.timeout_seconds)?;
        Ok(Self {
            api: Arc::new(client),
            store: ResumeStore::new(&config.storage.state_dir),
            config,
        })
    }

    fn audio_dir(&self) -> PathBuf {
        self.config.storage.state_dir.join("audio")
    }

    fn speaker(&self) -> FileAudioSink {
        FileAudioSink::new(self.audio_dir(), self.config.voice.player_command.clone())
    }
}

/// Line-oriented terminal input
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// `None` on end of input
    async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        print!("{}", label);
        std::io::stdout().flush().context("Failed to flush stdout")?;
        self.lines
            .next_line()
            .await
            .context("Failed to read from stdin")
    }
}

pub async fn handle_coach_command(cli: CoachCli, ctx: CoachContext) -> Result<()> {
    let mut prompt = Prompt::new();

    match cli.command {
        CoachCommand::Upload { file, start } => {
            let mut page = UploadPage::new(ctx.api.clone(), ctx.store.clone());
            page.select_file(&file);
            println!("Uploading {}...", file.display());

            match page.upload().await {
                Some(next) => {
                    println!("✅ Resume processed");
                    if let Some(role) = page.detected_role().filter(|r| !r.is_empty()) {
                        println!("   Detected role: {}", role);
                    }
                    if start {
                        run_flow(&ctx, &mut prompt, next, None, None).await?;
                    } else {
                        println!("   Next: interview-coach {}", next);
                    }
                }
                None => {
                    println!("❌ {}", page.error().unwrap_or(crate::session::upload::UPLOAD_ERROR));
                }
            }
        }

        CoachCommand::Interview { role, clip } => {
            run_flow(&ctx, &mut prompt, Page::Interview, role.as_deref(), clip).await?;
        }

        CoachCommand::Practice {
            role,
            difficulty,
            count,
        } => {
            let loaded = PracticeSession::start(
                ctx.api.clone(),
                &ctx.store,
                role.as_deref(),
                &ctx.config.default_role,
                &difficulty,
                count,
            )
            .await;
            match loaded {
                Loaded::Ready(session) => {
                    if let Some(next) = run_practice(session, &mut prompt).await? {
                        run_flow(&ctx, &mut prompt, next, None, None).await?;
                    }
                }
                Loaded::Redirect(page) => redirect_notice(page),
            }
        }

        CoachCommand::Arena { role, code_file } => {
            let loaded = ArenaSession::start(
                ctx.api.clone(),
                &ctx.store,
                role.as_deref(),
                &ctx.config.default_role,
            )
            .await;
            match loaded {
                Loaded::Ready(arena) => {
                    if let Some(next) = run_arena(arena, &mut prompt, code_file).await? {
                        run_flow(&ctx, &mut prompt, next, None, None).await?;
                    }
                }
                Loaded::Redirect(page) => redirect_notice(page),
            }
        }

        CoachCommand::Quiz => {
            run_flow(&ctx, &mut prompt, Page::Quiz, None, None).await?;
        }

        CoachCommand::Dashboard { csv } => {
            let dashboard = Dashboard::load(ctx.api.as_ref()).await;
            show_dashboard(&dashboard);
            if let Some(path) = csv {
                let count = dashboard.export_csv(&path)?;
                println!("Exported {} records to {}", count, path.display());
            }
        }

        CoachCommand::Speak { text, out } => {
            let mut sink = match out {
                Some(dir) => FileAudioSink::new(dir, ctx.config.voice.player_command.clone()),
                None => ctx.speaker(),
            };
            if voice::speak_text(ctx.api.as_ref(), &text, &mut sink).await {
                if let Some(path) = sink.last_file() {
                    println!("🔊 Saved speech to {}", path.display());
                }
            } else {
                println!("❌ Speech synthesis failed (see log)");
            }
        }

        CoachCommand::Listen { file } => {
            let mut recorder = VoiceRecorder::new(ctx.api.clone(), ClipFileSource::new(file));
            recorder.toggle().await;
            match recorder.toggle().await {
                Some(text) => println!("{}", text),
                None => println!("❌ Transcription failed (see log)"),
            }
        }

        CoachCommand::Evaluate { question, answer } => {
            let evaluation = match ctx.api.evaluate(&question, &answer).await {
                Ok(evaluation) => evaluation,
                Err(e) => {
                    app_log!(error, "Evaluation error: {:#}", e);
                    Evaluation::unavailable()
                }
            };
            print_evaluation(&evaluation);
        }

        CoachCommand::Reset => {
            if ctx.store.clear().await? {
                println!("✅ Stored resume removed");
            } else {
                println!("No resume stored");
            }
        }
    }

    Ok(())
}

/// Follow page navigation until a page stops the flow
async fn run_flow(
    ctx: &CoachContext,
    prompt: &mut Prompt,
    start: Page,
    role: Option<&str>,
    clip: Option<PathBuf>,
) -> Result<()> {
    let mut page = Some(start);
    let mut clip = clip;

    while let Some(current) = page {
        app_log!(info, "Entering {} page", current);
        page = match current {
            Page::Upload => {
                redirect_notice(Page::Upload);
                None
            }
            Page::Interview => {
                let loaded = InterviewSession::start(
                    ctx.api.clone(),
                    &ctx.store,
                    role,
                    &ctx.config.default_role,
                )
                .await;
                match loaded {
                    Loaded::Ready(session) => {
                        let source: Box<dyn AudioSource> = match clip.take() {
                            Some(path) => Box::new(ClipFileSource::new(path)),
                            None => Box::new(CommandAudioSource::new(
                                ctx.config.voice.recorder_command.clone(),
                                ctx.audio_dir(),
                            )),
                        };
                        let recorder = VoiceRecorder::new(ctx.api.clone(), source);
                        run_interview(session, recorder, ctx.speaker(), prompt).await?
                    }
                    Loaded::Redirect(target) => Some(target),
                }
            }
            Page::Arena => {
                let loaded =
                    ArenaSession::start(ctx.api.clone(), &ctx.store, role, &ctx.config.default_role)
                        .await;
                match loaded {
                    Loaded::Ready(arena) => run_arena(arena, prompt, None).await?,
                    Loaded::Redirect(target) => Some(target),
                }
            }
            Page::Quiz => {
                match QuizSession::start(ctx.api.clone(), &ctx.store, &ctx.config.default_role).await
                {
                    Loaded::Ready(quiz) => run_quiz(quiz, prompt).await?,
                    Loaded::Redirect(target) => Some(target),
                }
            }
            Page::Dashboard => {
                show_dashboard(&Dashboard::load(ctx.api.as_ref()).await);
                None
            }
        };
    }

    Ok(())
}

async fn run_interview<S: AudioSource>(
    mut session: InterviewSession,
    mut recorder: VoiceRecorder<S>,
    mut speaker: FileAudioSink,
    prompt: &mut Prompt,
) -> Result<Option<Page>> {
    println!("🎙  Mock interview for {}", session.role());
    println!("   Commands: /skip  /speak  /record  /quit\n");

    loop {
        print_question(
            session.current_question(),
            session.question_number(),
            MAX_EXCHANGES,
            session.score(),
        );

        let evaluation = loop {
            let label = if recorder.is_recording() {
                "● recording, /record to stop > "
            } else {
                "> "
            };
            let Some(line) = prompt.ask(label).await? else {
                return Ok(None);
            };

            let submitted = match line.trim() {
                "/quit" => return Ok(None),
                "/speak" => {
                    if session.speak_question(&mut speaker).await {
                        if let Some(path) = speaker.last_file() {
                            println!("🔊 {}", path.display());
                        }
                    } else {
                        println!("Audio unavailable");
                    }
                    continue;
                }
                "/record" => {
                    let was_recording = recorder.is_recording();
                    match recorder.toggle().await {
                        Some(transcript) => {
                            println!("📝 {}", transcript);
                            session.submit_answer(&transcript, false).await
                        }
                        None => {
                            if was_recording {
                                println!("Nothing transcribed, type your answer instead");
                            }
                            continue;
                        }
                    }
                }
                "/skip" => session.submit_answer("", true).await,
                answer => session.submit_answer(answer, false).await,
            };

            match submitted {
                Ok(evaluation) => break evaluation.clone(),
                Err(e) => println!("{}", e),
            }
        };

        print_evaluation(&evaluation);

        if prompt.ask("Press Enter for the next question ").await?.is_none() {
            return Ok(None);
        }
        if let Some(next) = session.advance() {
            println!(
                "\nInterview complete: {} of {} answers rated 7 or higher\n",
                session.score(),
                session.exchange_count()
            );
            return Ok(Some(next));
        }
    }
}

async fn run_practice(mut session: PracticeSession, prompt: &mut Prompt) -> Result<Option<Page>> {
    loop {
        let (n, total) = session.position();
        print_question(session.current_question(), n, total, session.score());

        let evaluation = loop {
            let Some(line) = prompt.ask("> ").await? else {
                return Ok(None);
            };
            if line.trim() == "/quit" {
                return Ok(None);
            }
            match session.submit_answer(&line).await {
                Ok(evaluation) => break evaluation.clone(),
                Err(e) => println!("{}", e),
            }
        };
        print_evaluation(&evaluation);

        if prompt.ask("Press Enter to continue ").await?.is_none() {
            return Ok(None);
        }
        if let Some(next) = session.advance() {
            println!("\nPractice score: {}/{}\n", session.score(), total);
            return Ok(Some(next));
        }
    }
}

async fn run_arena(
    mut arena: ArenaSession,
    prompt: &mut Prompt,
    code_file: Option<PathBuf>,
) -> Result<Option<Page>> {
    let Some(problem) = arena.problem().cloned() else {
        println!("❌ Could not load a coding problem (see log)");
        return Ok(Some(arena.finish()));
    };

    println!("⚔️  {} [{}]\n", problem.title, problem.difficulty);
    println!("{}\n", problem.description);

    let code = match code_file {
        Some(path) => FsOps::read_file_safe(&path).await?,
        None => {
            println!("Starter code:\n{}\n", arena.code());
            println!("Type your solution, then a line with a single '.' to submit:");
            let mut lines = Vec::new();
            loop {
                match prompt.ask("").await? {
                    Some(line) if line.trim() == "." => break,
                    Some(line) => lines.push(line),
                    None => break,
                }
            }
            if lines.is_empty() {
                arena.code().to_string()
            } else {
                lines.join("\n")
            }
        }
    };

    match arena.submit(code).await {
        Some(review) => print_review(review),
        None => println!("❌ Review unavailable (see log)"),
    }

    Ok(Some(arena.finish()))
}

async fn run_quiz(mut quiz: QuizSession, prompt: &mut Prompt) -> Result<Option<Page>> {
    if quiz.questions().is_empty() {
        println!("No quiz questions available");
        return Ok(Some(quiz.finish()));
    }

    println!("📋 Skill Assessment\n");
    let questions = quiz.questions().to_vec();
    for (i, question) in questions.iter().enumerate() {
        println!("{}. {}", i + 1, question.question);
        for (j, option) in question.options.iter().enumerate() {
            println!("   {}) {}", j + 1, option);
        }

        while quiz.answer(i).is_none() {
            let Some(line) = prompt.ask("Your choice: ").await? else {
                return Ok(None);
            };
            match line.trim().parse::<usize>() {
                Ok(n) if (1..=question.options.len()).contains(&n) => {
                    quiz.select(i, &question.options[n - 1]);
                }
                _ => println!("Pick a number between 1 and {}", question.options.len()),
            }
        }
        println!();
    }

    let score = quiz.submit().await?;
    println!("You Scored {} / {}\n", score, questions.len());
    for (i, question) in questions.iter().enumerate() {
        let mark = if quiz.outcome(i) == Some(true) { "✅" } else { "❌" };
        println!("{} {}", mark, question.question);
        if !question.explanation.is_empty() {
            println!("   {}", question.explanation);
        }
    }
    println!();

    Ok(Some(quiz.finish()))
}

fn redirect_notice(page: Page) {
    if page == Page::Upload {
        println!("No resume stored. Run `interview-coach upload <file>` first.");
    } else {
        println!("Continue with `interview-coach {}`", page);
    }
}

fn print_question(question: &Question, number: usize, total: usize, score: u32) {
    println!("Question {} of {}   Score: {}", number, total, score);
    if !question.kind.is_empty() || !question.topic.is_empty() {
        println!("[{}] {}", question.kind, question.topic);
    }
    println!("{}", question.question);
    if !question.hints.is_empty() {
        println!("Hints: {}", question.hints.join(", "));
    }
}

fn print_evaluation(evaluation: &Evaluation) {
    let mark = if evaluation.is_win() { "✅" } else { "⚠️ " };
    println!("{} Feedback (Rating: {}/10)", mark, evaluation.rating);
    if !evaluation.feedback.is_empty() {
        println!("   {}", evaluation.feedback);
    }
    if let Some(better) = &evaluation.better_answer {
        println!("   Suggested answer: \"{}\"", better);
    }
}

fn print_review(review: &CodeReview) {
    let verdict = if review.is_correct { "✅ Correct" } else { "❌ Incorrect" };
    println!("{}  Rating: {}/10  Complexity: {}", verdict, review.rating, review.time_complexity);
    println!("   {}", review.feedback);
    if let Some(code) = &review.optimized_code {
        println!("\nOptimized solution:\n{}", code);
    }
}

fn show_dashboard(dashboard: &Dashboard) {
    println!("📊 Performance Dashboard");
    println!(
        "   Total questions: {}   Average rating: {}/10   Skills analyzed: {}",
        dashboard.total_sessions(),
        dashboard.average_rating(),
        dashboard.skills_analyzed()
    );

    if dashboard.records().is_empty() {
        println!("   No history yet. Start an interview to see results.");
        return;
    }

    println!("{:<17} {:<12} {:<7} {}", "When", "Topic", "Rating", "Question");
    println!("{}", "-".repeat(80));
    for record in dashboard.records() {
        let when = record
            .recorded_at()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<17} {:<12} {:<7} {}",
            when, record.topic, record.rating, record.question
        );
    }
}
